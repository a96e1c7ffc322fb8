//! Outgoing request value.

use std::fmt;
use std::sync::Arc;

use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Url};
use tokio_util::sync::CancellationToken;

use crate::config::{Body, CacheMode, CorsMode, CredentialsMode, RedirectMode, ReferrerPolicy};
use crate::error_handling::{Error, Result, ValidationError};
use crate::interceptor::RequestInterceptor;
use crate::schema::ValidatedConfig;

/// Fetch knobs carried from the configuration to the transport.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub cache: CacheMode,
    pub credentials: Option<CredentialsMode>,
    pub mode: CorsMode,
    pub redirect: RedirectMode,
    pub referrer: String,
    pub referrer_policy: ReferrerPolicy,
    pub integrity: Option<String>,
    pub keepalive: bool,
    /// Cancellation handle; the transport aborts when it fires.
    pub signal: Option<CancellationToken>,
}

/// A request built for one send.
///
/// Method, URL and body are fixed at construction. Headers and the interceptor list
/// are the only parts that change before the request reaches the transport.
#[derive(Clone)]
pub struct HttpRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Body>,
    options: FetchOptions,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl HttpRequest {
    /// Creates a request with no headers, no body and default fetch options.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            options: FetchOptions::default(),
            interceptors: Vec::new(),
        }
    }

    /// Builds the request described by a validated configuration.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        Self {
            method: config.method.into(),
            url: config.url.clone(),
            headers: config.headers.clone(),
            body: config.body.clone(),
            options: FetchOptions {
                cache: config.cache,
                credentials: config.credentials,
                mode: config.mode,
                redirect: config.redirect,
                referrer: config.referrer.clone(),
                referrer_policy: config.referrer_policy,
                integrity: config.integrity.clone(),
                keepalive: config.keepalive,
                signal: config.signal.clone(),
            },
            interceptors: Vec::new(),
        }
    }

    /// Attaches a body. Used when building a request by hand.
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Replaces the fetch options. Used when building a request by hand.
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns a header value as text, ignoring case of the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Sets a header, replacing every existing value for that name.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), ValidationError> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ValidationError::new(format!("headers.{name}"), e.to_string()))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| ValidationError::new(format!("headers.{name}"), e.to_string()))?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    pub fn interceptors(&self) -> &[Arc<dyn RequestInterceptor>] {
        &self.interceptors
    }

    pub fn interceptors_mut(&mut self) -> &mut Vec<Arc<dyn RequestInterceptor>> {
        &mut self.interceptors
    }

    /// Runs the attached interceptors in order, each on the output of the previous one.
    ///
    /// The list is captured when interception starts; interceptors added while it runs
    /// are kept on the returned request but not run.
    pub async fn intercept(mut self) -> Result<Self> {
        let interceptors = std::mem::take(&mut self.interceptors);
        let mut request = self;
        for interceptor in &interceptors {
            debug!(
                "Running request interceptor '{}' for {} {}",
                interceptor.name(),
                request.method,
                request.url
            );
            request = interceptor
                .intercept(request)
                .await
                .map_err(|source| Error::Interceptor {
                    name: interceptor.name().to_string(),
                    source,
                })?;
        }
        let added = std::mem::take(&mut request.interceptors);
        request.interceptors = interceptors;
        request.interceptors.extend(added);
        Ok(request)
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.interceptors.iter().map(|i| i.name()).collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("options", &self.options)
            .field("interceptors", &names)
            .finish()
    }
}
