// Shared test helpers: a stub transport that records requests and serves a canned reply.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;

use interfetch::http::BodySource;
use interfetch::{HttpRequest, RawResponse, Transport, TransportError};

/// What the stub saw for one fetch.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Not every test file reads every field
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Transport answering every fetch with the same status, content type and body.
pub struct StubTransport {
    status: StatusCode,
    content_type: Option<&'static str>,
    body: &'static str,
    requests: Mutex<Vec<RecordedRequest>>,
    body_reads: Arc<AtomicUsize>,
}

#[allow(dead_code)] // Used by other test files
impl StubTransport {
    pub fn new(status: u16, content_type: Option<&'static str>, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status: StatusCode::from_u16(status).expect("valid status code"),
            content_type,
            body,
            requests: Mutex::new(Vec::new()),
            body_reads: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn json(body: &'static str) -> Arc<Self> {
        Self::new(200, Some("application/json"), body)
    }

    pub fn html(body: &'static str) -> Arc<Self> {
        Self::new(200, Some("text/html; charset=utf-8"), body)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("the transport was called at least once")
    }

    pub fn body_reads(&self) -> usize {
        self.body_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn fetch(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        self.requests.lock().expect("requests lock").push(RecordedRequest {
            method: request.method().to_string(),
            url: request.url().to_string(),
            headers: request.headers().clone(),
            body: request.body().and_then(|b| b.as_text()).map(str::to_string),
        });

        let mut headers = HeaderMap::new();
        if let Some(content_type) = self.content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }

        let reads = Arc::clone(&self.body_reads);
        let body = self.body;
        let source = BodySource::new(async move {
            reads.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from_static(body.as_bytes()))
        });

        Ok(RawResponse::new(
            self.status,
            headers,
            request.url().clone(),
            source,
        ))
    }
}
