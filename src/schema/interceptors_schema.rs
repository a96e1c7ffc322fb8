//! Validation of an [`InterceptorBundle`].
//!
//! Arity is fixed by the interceptor traits, so the remaining rule is that every
//! interceptor carries a real name. Blank names and placeholder names produced for
//! anonymous closures point at a mis-registration.

use crate::error_handling::{FieldIssue, ValidationError};
use crate::interceptor::InterceptorBundle;

const PLACEHOLDER_NAMES: &[&str] = &["anonymous", "<anonymous>", "<closure>"];

/// Rules for interceptor bundles.
pub struct InterceptorsSchema;

impl InterceptorsSchema {
    /// Checks every interceptor name and returns the bundle unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] with one issue per bad entry, using field paths
    /// such as `request[1]`.
    pub fn parse(bundle: InterceptorBundle) -> Result<InterceptorBundle, ValidationError> {
        let mut issues = Vec::new();
        for (i, interceptor) in bundle.request.iter().enumerate() {
            check_name("request", i, interceptor.name(), &mut issues);
        }
        for (i, interceptor) in bundle.response.iter().enumerate() {
            check_name("response", i, interceptor.name(), &mut issues);
        }

        if issues.is_empty() {
            Ok(bundle)
        } else {
            Err(ValidationError::from_issues(issues))
        }
    }
}

fn check_name(list: &str, index: usize, name: &str, issues: &mut Vec<FieldIssue>) {
    let trimmed = name.trim();
    let message = if trimmed.is_empty() {
        "interceptor must be named"
    } else if trimmed.contains("{{closure}}")
        || PLACEHOLDER_NAMES
            .iter()
            .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
    {
        "interceptor name looks anonymous"
    } else {
        return;
    };
    issues.push(FieldIssue {
        field: format!("{list}[{index}]"),
        message: message.to_string(),
    });
}
