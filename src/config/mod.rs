//! Request configuration, defaults and environment settings.
//!
//! This module provides:
//! - Default values and environment variable names
//! - The case-insensitive [`Headers`] bag
//! - [`RequestConfig`] and the fetch option enums
//! - Process-wide [`Settings`] read from the environment
//! - Command-line options of the binary ([`Opt`])

mod cli;
mod constants;
mod headers;
mod settings;
mod types;

pub use cli::Opt;
pub use constants::*;
pub use headers::{Headers, HEADER_CONTENT_TYPE};
pub use settings::{settings, Settings};
pub use types::{
    Body, CacheMode, CorsMode, CredentialsMode, HttpMethod, JsonPayload, LogFormat, LogLevel,
    RedirectMode, ReferrerPolicy, RequestConfig,
};
