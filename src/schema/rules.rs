//! Declarative per-field rules.
//!
//! A rule fills in a default for a missing value, converts the value (coercion and
//! normalization) and checks a predicate on the result. Failures are collected as
//! [`FieldIssue`]s so one pass reports every bad field.

use crate::error_handling::FieldIssue;

type Convert<I, O> = fn(I) -> Result<O, String>;

/// Rule for one configuration field, taking an input of type `I` to an output of
/// type `O`.
pub(crate) struct FieldRule<I, O = I> {
    field: &'static str,
    default: Option<fn() -> I>,
    convert: Convert<I, O>,
    check: Option<(fn(&O) -> bool, &'static str)>,
}

impl<T> FieldRule<T, T> {
    /// A rule that keeps the value as is.
    pub(crate) fn new(field: &'static str) -> Self {
        Self::converting(field, Ok)
    }
}

impl<I, O> FieldRule<I, O> {
    /// A rule that converts the value with `convert`.
    pub(crate) fn converting(field: &'static str, convert: Convert<I, O>) -> Self {
        Self {
            field,
            default: None,
            convert,
            check: None,
        }
    }

    pub(crate) fn default_to(mut self, default: fn() -> I) -> Self {
        self.default = Some(default);
        self
    }

    pub(crate) fn check(mut self, predicate: fn(&O) -> bool, message: &'static str) -> Self {
        self.check = Some((predicate, message));
        self
    }

    /// Applies the rule. Returns `None` when the value is absent without a default,
    /// or when it fails, in which case an issue is recorded.
    pub(crate) fn apply(&self, value: Option<I>, issues: &mut Vec<FieldIssue>) -> Option<O> {
        let value = value.or_else(|| self.default.map(|default| default()))?;
        let converted = match (self.convert)(value) {
            Ok(converted) => converted,
            Err(message) => {
                self.fail(message, issues);
                return None;
            }
        };
        if let Some((predicate, message)) = self.check {
            if !predicate(&converted) {
                self.fail(message.to_string(), issues);
                return None;
            }
        }
        Some(converted)
    }

    fn fail(&self, message: String, issues: &mut Vec<FieldIssue>) {
        issues.push(FieldIssue {
            field: self.field.to_string(),
            message,
        });
    }
}
