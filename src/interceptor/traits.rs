//! Interceptor traits and closure adapters.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::http::{HttpRequest, HttpResponse};

/// Observes or rewrites a request before it reaches the transport.
///
/// Interceptors run strictly one after another; each receives the request returned
/// by the previous one.
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Name used in logs and validated by the interceptors schema.
    fn name(&self) -> &str;

    /// Returns the (possibly modified) request.
    async fn intercept(&self, request: HttpRequest) -> anyhow::Result<HttpRequest>;
}

/// Observes or rewrites a successful response after its body has been resolved.
#[async_trait]
pub trait ResponseInterceptor: Send + Sync {
    /// Name used in logs and validated by the interceptors schema.
    fn name(&self) -> &str;

    /// Returns the (possibly modified) response.
    async fn intercept(&self, response: HttpResponse) -> anyhow::Result<HttpResponse>;
}

/// A named async closure acting as a [`RequestInterceptor`].
pub struct FnRequestInterceptor<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F, Fut> RequestInterceptor for FnRequestInterceptor<F>
where
    F: Fn(HttpRequest) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<HttpRequest>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn intercept(&self, request: HttpRequest) -> anyhow::Result<HttpRequest> {
        (self.f)(request).await
    }
}

/// A named async closure acting as a [`ResponseInterceptor`].
pub struct FnResponseInterceptor<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F, Fut> ResponseInterceptor for FnResponseInterceptor<F>
where
    F: Fn(HttpResponse) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<HttpResponse>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn intercept(&self, response: HttpResponse) -> anyhow::Result<HttpResponse> {
        (self.f)(response).await
    }
}

/// Wraps an async closure into a shareable request interceptor.
///
/// The returned `Arc` is the interceptor's identity: registering the same `Arc` in
/// several layers runs it once.
///
/// ```
/// use interfetch::{request_interceptor, RequestInterceptor};
///
/// let tag = request_interceptor("tag", |mut request| async move {
///     request.set_header("x-tag", "1")?;
///     Ok::<_, anyhow::Error>(request)
/// });
/// assert_eq!(tag.name(), "tag");
/// ```
pub fn request_interceptor<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn RequestInterceptor>
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<HttpRequest>> + Send + 'static,
{
    Arc::new(FnRequestInterceptor {
        name: name.into(),
        f,
    })
}

/// Wraps an async closure into a shareable response interceptor.
pub fn response_interceptor<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn ResponseInterceptor>
where
    F: Fn(HttpResponse) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<HttpResponse>> + Send + 'static,
{
    Arc::new(FnResponseInterceptor {
        name: name.into(),
        f,
    })
}
