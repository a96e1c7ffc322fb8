//! interfetch library: a layered HTTP client with an HTML scraping helper
//!
//! Requests are described by a mergeable [`RequestConfig`]. A client combines its
//! profile's baseline, its own defaults and the per-call configuration (in that order
//! of increasing precedence), validates the result once, and runs it through request
//! interceptors, the injected [`Transport`], and response interceptors.
//!
//! # Example
//!
//! ```no_run
//! use interfetch::initialization::init_transport;
//! use interfetch::{HttpClient, InterceptorBundle, RequestConfig, request_interceptor};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(init_transport(None)?)?;
//! let api = client.fork(
//!     &RequestConfig::new().origin("https://api.example.com"),
//!     &InterceptorBundle::new().with_request(request_interceptor("auth", |mut request| async move {
//!         request.set_header("authorization", "Bearer token")?;
//!         Ok::<_, anyhow::Error>(request)
//!     })),
//! );
//!
//! let mut response = api
//!     .get(RequestConfig::new().path("/items"), InterceptorBundle::new())
//!     .await?;
//! println!("{:?}", response.json().await?);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod client;
pub mod config;
mod error_handling;
pub mod http;
pub mod initialization;
pub mod interceptor;
pub mod schema;
pub mod scrape;

// Re-export public API
pub use client::{HttpClient, Profile};
pub use config::{Body, Headers, JsonPayload, RequestConfig, Settings};
pub use error_handling::{
    Error, FieldIssue, InitializationError, RequestFailedError, Result, TransportError,
    ValidationError,
};
pub use http::{HttpRequest, HttpResponse, RawResponse, ReqwestTransport, Transport};
pub use interceptor::{
    request_interceptor, response_interceptor, InterceptorBundle, RequestInterceptor,
    ResponseInterceptor,
};
pub use scrape::{HtmlDocument, ScrapeResult, Scraper};
