//! Transport boundary.
//!
//! The client never talks to the network directly. It hands each request to a
//! [`Transport`] and gets back a [`RawResponse`] whose body has not been read yet.

use std::fmt;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Url};

use super::request::HttpRequest;
use crate::error_handling::TransportError;

/// Fetch-like primitive used by the client for every send.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response head plus an unread body.
    async fn fetch(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;
}

/// Deferred body read. Not polled until the body is first resolved.
pub struct BodySource {
    // Mutex only makes the boxed future Sync; access is always through `&mut`/by value.
    future: Mutex<BoxFuture<'static, Result<Bytes, TransportError>>>,
}

impl BodySource {
    /// Wraps a future yielding the full body.
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<Bytes, TransportError>> + Send + 'static,
    {
        Self {
            future: Mutex::new(future.boxed()),
        }
    }

    /// A body that is already in memory.
    pub fn ready(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self::new(async move { Ok(bytes) })
    }

    /// Reads the whole body.
    pub async fn read(self) -> Result<Bytes, TransportError> {
        let future = self
            .future
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        future.await
    }
}

impl fmt::Debug for BodySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BodySource { .. }")
    }
}

/// Response head and unread body, as returned by a [`Transport`].
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Final URL, after any redirects the transport followed.
    pub url: Url,
    pub body: BodySource,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url, body: BodySource) -> Self {
        Self {
            status,
            headers,
            url,
            body,
        }
    }

    /// Transport's own success classification (2xx).
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }
}
