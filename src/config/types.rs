//! Configuration types.
//!
//! [`RequestConfig`] is the mergeable, unvalidated description of a request. Every field
//! is optional so a merge can tell "not set" apart from "set to the default"; the
//! configuration schema fills in defaults once, after the final merge.

use std::time::Duration;

use clap::ValueEnum;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use tokio_util::sync::CancellationToken;

use super::headers::Headers;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// HTTP verbs accepted in a configuration, parsed case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Connect => reqwest::Method::CONNECT,
            HttpMethod::Options => reqwest::Method::OPTIONS,
            HttpMethod::Trace => reqwest::Method::TRACE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Cache directive of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CacheMode {
    Default,
    NoStore,
    Reload,
    #[default]
    NoCache,
    ForceCache,
    OnlyIfCached,
}

/// Credentials mode of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CredentialsMode {
    Omit,
    SameOrigin,
    Include,
}

/// CORS mode of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CorsMode {
    Cors,
    #[default]
    NoCors,
    SameOrigin,
    Navigate,
}

/// Redirect handling of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RedirectMode {
    #[default]
    Follow,
    Error,
    Manual,
}

/// Referrer policy of a request. `Unset` is the empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ReferrerPolicy {
    #[default]
    #[strum(serialize = "")]
    Unset,
    NoReferrer,
    NoReferrerWhenDowngrade,
    Origin,
    OriginWhenCrossOrigin,
    SameOrigin,
    StrictOrigin,
    StrictOriginWhenCrossOrigin,
    UnsafeUrl,
}

/// Physical request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// URL search params, sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// Explicit null: no body is sent, even when an earlier layer set one.
    Empty,
}

impl Body {
    /// Returns the body as text when it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

/// A JSON payload, either structured or already stringified.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonPayload {
    /// A JSON value, serialized during validation.
    Value(serde_json::Value),
    /// A pre-stringified document; it must parse as JSON.
    Raw(String),
}

impl From<serde_json::Value> for JsonPayload {
    fn from(value: serde_json::Value) -> Self {
        JsonPayload::Value(value)
    }
}

/// Mergeable request configuration.
///
/// # Examples
///
/// ```
/// use interfetch::RequestConfig;
///
/// let config = RequestConfig::new()
///     .origin("https://example.com/")
///     .path("/items")
///     .method("post")
///     .header("Accept", "application/json");
/// assert_eq!(config.headers.get("accept"), Some("application/json"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Cache directive (default `no-cache`).
    pub cache: Option<CacheMode>,
    /// Credentials mode.
    pub credentials: Option<CredentialsMode>,
    /// Wait applied after the response is fully processed (default zero).
    pub delay: Option<Duration>,
    /// Headers; merged name by name rather than replaced.
    pub headers: Headers,
    /// Subresource integrity metadata.
    pub integrity: Option<String>,
    /// Keep-alive flag (default `false`).
    pub keepalive: Option<bool>,
    /// CORS mode (default `no-cors`).
    pub mode: Option<CorsMode>,
    /// Redirect handling (default `follow`).
    pub redirect: Option<RedirectMode>,
    /// Referrer URL (default empty).
    pub referrer: Option<String>,
    /// Referrer policy (default empty).
    pub referrer_policy: Option<ReferrerPolicy>,
    /// Cancellation handle threaded into the transport.
    pub signal: Option<CancellationToken>,
    /// Absolute origin; a trailing slash is stripped during validation.
    pub origin: Option<String>,
    /// Request path, must start with `/` (default `/`).
    pub path: Option<String>,
    /// HTTP verb in any case (default `GET`).
    pub method: Option<String>,
    /// JSON payload; takes precedence over `body`.
    pub json: Option<JsonPayload>,
    /// Physical body (default none).
    pub body: Option<Body>,
}

impl RequestConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Adds one header, replacing any header of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Adds every header of `headers`.
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers.extend_from(&headers);
        self
    }

    pub fn integrity(mut self, integrity: impl Into<String>) -> Self {
        self.integrity = Some(integrity.into());
        self
    }

    pub fn keepalive(mut self, keepalive: bool) -> Self {
        self.keepalive = Some(keepalive);
        self
    }

    pub fn mode(mut self, mode: CorsMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn redirect(mut self, redirect: RedirectMode) -> Self {
        self.redirect = Some(redirect);
        self
    }

    pub fn referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn referrer_policy(mut self, policy: ReferrerPolicy) -> Self {
        self.referrer_policy = Some(policy);
        self
    }

    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets a structured JSON payload.
    pub fn json(mut self, json: impl Into<JsonPayload>) -> Self {
        self.json = Some(json.into());
        self
    }

    /// Sets a pre-stringified JSON payload.
    pub fn json_str(mut self, json: impl Into<String>) -> Self {
        self.json = Some(JsonPayload::Raw(json.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the body to null, overriding any body from a lower layer.
    pub fn no_body(mut self) -> Self {
        self.body = Some(Body::Empty);
        self
    }
}
