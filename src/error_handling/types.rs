//! Error type definitions.
//!
//! This module defines every error surfaced by the client, the schemas and the scraper.

use std::fmt;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

use crate::http::HttpResponse;

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error of a send, scrape or cache lookup.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration or interceptor bundle failed validation. Raised before any
    /// network activity.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The transport answered with a non-success status.
    #[error(transparent)]
    RequestFailed(#[from] RequestFailedError),

    /// The transport itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An interceptor returned an error.
    #[error("Interceptor '{name}' failed: {source}")]
    Interceptor {
        /// Name of the failing interceptor.
        name: String,
        /// Error returned by the interceptor.
        #[source]
        source: anyhow::Error,
    },

    /// The response declared a JSON content type but its body is not JSON.
    #[error("Failed to decode JSON body from {url}: {source}")]
    Decode {
        /// URL of the response.
        url: String,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// A previous body read was interrupted and the body can no longer be read.
    #[error("Response body is unavailable: a previous read was interrupted")]
    BodyUnavailable,

    /// Cache file I/O failed.
    #[error(transparent)]
    Cache(#[from] std::io::Error),

    /// No profile with this name is registered.
    #[error("Unknown client profile: {0}")]
    UnknownProfile(String),
}

/// One rule violation found by a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Field (or field path) that failed.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A configuration or interceptor bundle that failed its declarative rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Creates an error holding a single issue.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                field: field.into(),
                message: message.into(),
            }],
        }
    }

    pub(crate) fn from_issues(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// Every violation, in rule order.
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Returns `true` if `field` has at least one violation.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// A response whose status is outside the success range.
///
/// Holds the full response; its body has not been read and can still be resolved
/// by the caller.
#[derive(Error, Debug)]
pub struct RequestFailedError {
    response: Box<HttpResponse>,
}

impl fmt::Display for RequestFailedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Request failed with status {} for {} {}",
            self.response.status(),
            self.response.request().method(),
            self.response.url()
        )
    }
}

impl RequestFailedError {
    pub(crate) fn new(response: HttpResponse) -> Self {
        Self {
            response: Box::new(response),
        }
    }

    /// The failed response.
    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    /// Mutable access, e.g. to resolve the body.
    pub fn response_mut(&mut self) -> &mut HttpResponse {
        &mut self.response
    }

    /// Takes ownership of the failed response.
    pub fn into_response(self) -> HttpResponse {
        *self.response
    }
}

/// Failure of the injected transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Error reported by reqwest.
    #[error("HTTP transport error: {0}")]
    Reqwest(#[from] ReqwestError),

    /// The request's cancellation signal fired.
    #[error("Request aborted")]
    Aborted,

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}
