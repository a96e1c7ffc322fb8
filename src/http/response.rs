//! Response value with a once-only body cell.

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::is_json_content_type;
use super::request::HttpRequest;
use super::transport::{BodySource, RawResponse};
use crate::error_handling::{Error, Result};
use crate::interceptor::ResponseInterceptor;

/// Body materialization state.
///
/// `Unresolved -> Resolving -> Resolved`. A read that is dropped while in flight
/// leaves the cell in `Resolving`, after which the body is unavailable.
enum BodyCell {
    Unresolved(BodySource),
    Resolving,
    Resolved,
}

impl fmt::Debug for BodyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyCell::Unresolved(_) => f.write_str("Unresolved"),
            BodyCell::Resolving => f.write_str("Resolving"),
            BodyCell::Resolved => f.write_str("Resolved"),
        }
    }
}

/// A response to one send.
///
/// `content` (text) and `data` (parsed JSON) are filled the first time the body is
/// resolved and never read from the transport again.
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    request: HttpRequest,
    body: BodyCell,
    content: Option<String>,
    data: Option<Value>,
    interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl HttpResponse {
    /// Wraps a raw transport response together with the request that produced it.
    pub fn new(raw: RawResponse, request: HttpRequest) -> Self {
        Self {
            status: raw.status,
            headers: raw.headers,
            url: raw.url,
            request,
            body: BodyCell::Unresolved(raw.body),
            content: None,
            data: None,
            interceptors: Vec::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// `true` for a 2xx status.
    pub fn ok(&self) -> bool {
        self.status.is_success()
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

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request this response answers.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Body text, once resolved.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Parsed JSON body, once resolved and only for JSON content types.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Replaces the body text seen by later interceptors and the caller.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    /// Replaces the parsed JSON body.
    pub fn set_data(&mut self, data: Option<Value>) {
        self.data = data;
    }

    /// Returns `true` once the body has been read.
    pub fn is_resolved(&self) -> bool {
        matches!(self.body, BodyCell::Resolved)
    }

    pub fn interceptors(&self) -> &[Arc<dyn ResponseInterceptor>] {
        &self.interceptors
    }

    pub fn interceptors_mut(&mut self) -> &mut Vec<Arc<dyn ResponseInterceptor>> {
        &mut self.interceptors
    }

    /// Reads the body once: as JSON when the content type says so, else as text.
    ///
    /// Later calls return immediately. A JSON content type with a body that does not
    /// parse fails with [`Error::Decode`]; `content` keeps the raw text in that case.
    pub async fn resolve_body(&mut self) -> Result<()> {
        let source = match std::mem::replace(&mut self.body, BodyCell::Resolving) {
            BodyCell::Unresolved(source) => source,
            BodyCell::Resolved => {
                self.body = BodyCell::Resolved;
                return Ok(());
            }
            BodyCell::Resolving => return Err(Error::BodyUnavailable),
        };

        let bytes = source.read().await?;
        debug!("Read {} body bytes from {}", bytes.len(), self.url);

        let content = String::from_utf8_lossy(&bytes).into_owned();
        let wants_json = self
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(is_json_content_type);

        self.body = BodyCell::Resolved;
        if wants_json && !content.trim().is_empty() {
            match serde_json::from_str(&content) {
                Ok(value) => self.data = Some(value),
                Err(source) => {
                    warn!("Body of {} is not valid JSON: {}", self.url, source);
                    self.content = Some(content);
                    return Err(Error::Decode {
                        url: self.url.to_string(),
                        source,
                    });
                }
            }
        }
        self.content = Some(content);
        Ok(())
    }

    /// Resolves the body and returns its text.
    pub async fn text(&mut self) -> Result<&str> {
        self.resolve_body().await?;
        Ok(self.content.as_deref().unwrap_or_default())
    }

    /// Resolves the body and returns the parsed JSON, if the content type was JSON.
    pub async fn json(&mut self) -> Result<Option<&Value>> {
        self.resolve_body().await?;
        Ok(self.data.as_ref())
    }

    /// Resolves the body and deserializes it, regardless of the content type.
    pub async fn json_as<T: DeserializeOwned>(&mut self) -> Result<T> {
        self.resolve_body().await?;
        let parsed = match &self.data {
            Some(value) => serde_json::from_value(value.clone()),
            None => serde_json::from_str(self.content.as_deref().unwrap_or_default()),
        };
        parsed.map_err(|source| Error::Decode {
            url: self.url.to_string(),
            source,
        })
    }

    /// Resolves the body, then runs the attached interceptors in order.
    pub async fn intercept(mut self) -> Result<Self> {
        self.resolve_body().await?;

        let interceptors = std::mem::take(&mut self.interceptors);
        let mut response = self;
        for interceptor in &interceptors {
            debug!(
                "Running response interceptor '{}' for {} ({})",
                interceptor.name(),
                response.url,
                response.status
            );
            response = interceptor
                .intercept(response)
                .await
                .map_err(|source| Error::Interceptor {
                    name: interceptor.name().to_string(),
                    source,
                })?;
        }
        let added = std::mem::take(&mut response.interceptors);
        response.interceptors = interceptors;
        response.interceptors.extend(added);
        Ok(response)
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.interceptors.iter().map(|i| i.name()).collect();
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("url", &self.url.as_str())
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("content", &self.content)
            .field("data", &self.data)
            .field("interceptors", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::TransportError;
    use reqwest::header::HeaderValue;
    use reqwest::Method;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn raw(status: u16, content_type: &str, body: BodySource) -> RawResponse {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        RawResponse::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            Url::parse("https://x.test/items").unwrap(),
            body,
        )
    }

    fn request() -> HttpRequest {
        HttpRequest::new(Method::GET, Url::parse("https://x.test/items").unwrap())
    }

    fn counted_body(text: &'static str, reads: Arc<AtomicUsize>) -> BodySource {
        BodySource::new(async move {
            reads.fetch_add(1, Ordering::SeqCst);
            Ok(bytes::Bytes::from_static(text.as_bytes()))
        })
    }

    #[tokio::test]
    async fn test_json_body_is_parsed_once() {
        let reads = Arc::new(AtomicUsize::new(0));
        let mut response = HttpResponse::new(
            raw(200, "application/json", counted_body(r#"{"n":5}"#, reads.clone())),
            request(),
        );

        assert!(!response.is_resolved());
        response.resolve_body().await.unwrap();
        response.resolve_body().await.unwrap();
        assert_eq!(response.text().await.unwrap(), r#"{"n":5}"#);

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(response.data(), Some(&serde_json::json!({"n": 5})));
        assert!(response.is_resolved());
    }

    #[tokio::test]
    async fn test_text_body_has_no_data() {
        let mut response = HttpResponse::new(
            raw(200, "text/html", BodySource::ready("<p>hi</p>")),
            request(),
        );
        assert_eq!(response.json().await.unwrap(), None);
        assert_eq!(response.content(), Some("<p>hi</p>"));
    }

    #[tokio::test]
    async fn test_invalid_json_keeps_text_and_fails_once() {
        let mut response = HttpResponse::new(
            raw(200, "application/problem+json", BodySource::ready("not json")),
            request(),
        );
        assert!(matches!(
            response.resolve_body().await,
            Err(Error::Decode { .. })
        ));
        assert_eq!(response.content(), Some("not json"));
        assert!(response.resolve_body().await.is_ok());
        assert_eq!(response.data(), None);
    }

    #[tokio::test]
    async fn test_failed_read_leaves_body_unavailable() {
        let mut response = HttpResponse::new(
            raw(
                200,
                "text/plain",
                BodySource::new(async { Err(TransportError::Aborted) }),
            ),
            request(),
        );
        assert!(matches!(
            response.resolve_body().await,
            Err(Error::Transport(TransportError::Aborted))
        ));
        assert!(matches!(
            response.resolve_body().await,
            Err(Error::BodyUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_json_as_deserializes_text_bodies() {
        #[derive(serde::Deserialize)]
        struct Count {
            n: u32,
        }
        let mut response = HttpResponse::new(
            raw(200, "text/plain", BodySource::ready(r#"{"n":7}"#)),
            request(),
        );
        let count: Count = response.json_as().await.unwrap();
        assert_eq!(count.n, 7);
    }
}
