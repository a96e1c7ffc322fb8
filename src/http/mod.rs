//! Request and response values and the transport boundary.
//!
//! This module provides:
//! - [`HttpRequest`]: the request built for one send, with its interceptor list
//! - [`HttpResponse`]: the response with its once-only body cell
//! - [`Transport`]: the injected fetch-like primitive, and [`ReqwestTransport`]

mod reqwest_transport;
mod request;
mod response;
mod transport;

pub use reqwest_transport::ReqwestTransport;
pub use request::{FetchOptions, HttpRequest};
pub use response::HttpResponse;
pub use transport::{BodySource, RawResponse, Transport};

/// Returns `true` if a content type names a JSON media type
/// (`application/json` or any `+json` suffix), ignoring parameters and case.
pub fn is_json_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_json_content_type() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("application/json;charset=UTF-8"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/ld+json"));
        assert!(!is_json_content_type("text/html; charset=utf-8"));
        assert!(!is_json_content_type("application/jsonp"));
        assert!(!is_json_content_type(""));
    }
}
