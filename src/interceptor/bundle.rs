//! Paired request/response interceptor lists.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::traits::{RequestInterceptor, ResponseInterceptor};

/// Ordered request and response interceptors.
///
/// Identity is `Arc` pointer identity. [`InterceptorBundle::merge`] keeps the first
/// occurrence of each interceptor and the order in which distinct interceptors were
/// first introduced.
#[derive(Clone, Default)]
pub struct InterceptorBundle {
    /// Request interceptors, in run order.
    pub request: Vec<Arc<dyn RequestInterceptor>>,
    /// Response interceptors, in run order.
    pub response: Vec<Arc<dyn ResponseInterceptor>>,
}

impl InterceptorBundle {
    /// Creates an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a request interceptor.
    pub fn with_request(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request.push(interceptor);
        self
    }

    /// Appends a response interceptor.
    pub fn with_response(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response.push(interceptor);
        self
    }

    /// Returns `true` if both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.request.is_empty() && self.response.is_empty()
    }

    /// Concatenates `self` then `other` per list and drops repeated interceptors.
    pub fn merge(&self, other: &InterceptorBundle) -> InterceptorBundle {
        InterceptorBundle {
            request: dedup_by_identity(self.request.iter().chain(&other.request).cloned()),
            response: dedup_by_identity(self.response.iter().chain(&other.response).cloned()),
        }
    }

    /// Names of the request interceptors, in run order.
    pub fn request_names(&self) -> Vec<&str> {
        self.request.iter().map(|i| i.name()).collect()
    }

    /// Names of the response interceptors, in run order.
    pub fn response_names(&self) -> Vec<&str> {
        self.response.iter().map(|i| i.name()).collect()
    }
}

impl fmt::Debug for InterceptorBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorBundle")
            .field("request", &self.request_names())
            .field("response", &self.response_names())
            .finish()
    }
}

/// Keeps the first occurrence of every `Arc`, compared by data pointer.
fn dedup_by_identity<T: ?Sized>(
    items: impl IntoIterator<Item = Arc<T>>,
) -> Vec<Arc<T>> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(Arc::as_ptr(item).cast::<()>()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interceptor::{request_interceptor, response_interceptor};

    #[test]
    fn test_dedup_keeps_first_seen_order() {
        let f = request_interceptor("f", |r| async move { Ok(r) });
        let g = request_interceptor("g", |r| async move { Ok(r) });
        let h = request_interceptor("h", |r| async move { Ok(r) });

        let left = InterceptorBundle::new()
            .with_request(f.clone())
            .with_request(g.clone());
        let right = InterceptorBundle::new()
            .with_request(g.clone())
            .with_request(h.clone());

        let merged = left.merge(&right);
        assert_eq!(merged.request_names(), vec!["f", "g", "h"]);
    }

    #[test]
    fn test_same_name_different_identity_is_kept() {
        let a = response_interceptor("log", |r| async move { Ok(r) });
        let b = response_interceptor("log", |r| async move { Ok(r) });
        let merged = InterceptorBundle::new()
            .with_response(a)
            .merge(&InterceptorBundle::new().with_response(b));
        assert_eq!(merged.response.len(), 2);
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let f = request_interceptor("f", |r| async move { Ok(r) });
        let left = InterceptorBundle::new().with_request(f.clone());
        let right = InterceptorBundle::new().with_request(f);
        let merged = left.merge(&right);
        assert_eq!(merged.request.len(), 1);
        assert_eq!(left.request.len(), 1);
        assert_eq!(right.request.len(), 1);
        assert!(merged.response.is_empty());
    }

    #[test]
    fn test_is_empty_checks_both_lists() {
        assert!(InterceptorBundle::new().is_empty());
        let only_response = InterceptorBundle::new()
            .with_response(response_interceptor("log", |r| async move { Ok(r) }));
        assert!(!only_response.is_empty());
        assert!(only_response.merge(&InterceptorBundle::new()).request.is_empty());
    }

    #[test]
    fn test_debug_lists_names() {
        let bundle = InterceptorBundle::new()
            .with_request(request_interceptor("auth", |r| async move { Ok(r) }));
        assert_eq!(
            format!("{bundle:?}"),
            r#"InterceptorBundle { request: ["auth"], response: [] }"#
        );
    }
}
