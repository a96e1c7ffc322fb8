//! Process initialization.
//!
//! This module provides functions to set up shared resources:
//! - The logger (plain or JSON output)
//! - The network transport shared by every client
//!
//! All initialization functions return [`InitializationError`] on failure.

mod logger;

use std::sync::Arc;

use crate::error_handling::InitializationError;
use crate::http::{ReqwestTransport, Transport};

pub use logger::init_logger_with;

/// Initializes the `reqwest`-backed transport.
///
/// Uses `user_agent` when given, the crate's default User-Agent otherwise.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if a client cannot be built.
pub fn init_transport(user_agent: Option<&str>) -> Result<Arc<dyn Transport>, InitializationError> {
    let transport = match user_agent {
        Some(user_agent) => ReqwestTransport::with_user_agent(user_agent)?,
        None => ReqwestTransport::new()?,
    };
    Ok(Arc::new(transport))
}
