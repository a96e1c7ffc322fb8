//! Configuration and interceptor merge algorithms.
//!
//! Both merges are pure and return fresh values, so a merged snapshot never shares
//! mutable state with its inputs.

use crate::config::RequestConfig;
use crate::interceptor::InterceptorBundle;

/// Merges two configurations; `b` wins on every field it sets.
///
/// Headers are merged name by name (case-insensitively) instead of replaced.
pub fn merge_config(a: &RequestConfig, b: &RequestConfig) -> RequestConfig {
    let mut headers = a.headers.clone();
    headers.extend_from(&b.headers);

    RequestConfig {
        cache: b.cache.or(a.cache),
        credentials: b.credentials.or(a.credentials),
        delay: b.delay.or(a.delay),
        headers,
        integrity: b.integrity.clone().or_else(|| a.integrity.clone()),
        keepalive: b.keepalive.or(a.keepalive),
        mode: b.mode.or(a.mode),
        redirect: b.redirect.or(a.redirect),
        referrer: b.referrer.clone().or_else(|| a.referrer.clone()),
        referrer_policy: b.referrer_policy.or(a.referrer_policy),
        signal: b.signal.clone().or_else(|| a.signal.clone()),
        origin: b.origin.clone().or_else(|| a.origin.clone()),
        path: b.path.clone().or_else(|| a.path.clone()),
        method: b.method.clone().or_else(|| a.method.clone()),
        json: b.json.clone().or_else(|| a.json.clone()),
        body: b.body.clone().or_else(|| a.body.clone()),
    }
}

/// Merges two interceptor bundles: `a`'s lists then `b`'s, each interceptor kept
/// once at its first position.
pub fn merge_interceptors(a: &InterceptorBundle, b: &InterceptorBundle) -> InterceptorBundle {
    a.merge(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Body, CacheMode, RedirectMode};
    use crate::interceptor::request_interceptor;
    use std::time::Duration;

    #[test]
    fn test_precedence_ladder() {
        let class = RequestConfig::new()
            .origin("https://class.test")
            .path("/class")
            .method("GET")
            .cache(CacheMode::Default);
        let instance = RequestConfig::new()
            .path("/instance")
            .method("POST");
        let call = RequestConfig::new().method("PUT");

        let merged = merge_config(&merge_config(&class, &instance), &call);
        assert_eq!(merged.method.as_deref(), Some("PUT"));
        assert_eq!(merged.path.as_deref(), Some("/instance"));
        assert_eq!(merged.origin.as_deref(), Some("https://class.test"));
        assert_eq!(merged.cache, Some(CacheMode::Default));
    }

    #[test]
    fn test_headers_are_additive() {
        let a = RequestConfig::new().header("a", "1");
        let b = RequestConfig::new().header("b", "2");
        let merged = merge_config(&a, &b);
        assert_eq!(merged.headers.get("a"), Some("1"));
        assert_eq!(merged.headers.get("b"), Some("2"));
    }

    #[test]
    fn test_header_collision_right_wins_ignoring_case() {
        let a = RequestConfig::new().header("A", "1");
        let b = RequestConfig::new().header("a", "2");
        let merged = merge_config(&a, &b);
        assert_eq!(merged.headers.len(), 1);
        assert_eq!(merged.headers.get("A"), Some("2"));
    }

    #[test]
    fn test_unset_fields_are_preserved() {
        let a = RequestConfig::new()
            .delay(Duration::from_millis(10))
            .redirect(RedirectMode::Manual)
            .referrer("https://ref.test/");
        let merged = merge_config(&a, &RequestConfig::new());
        assert_eq!(merged.delay, Some(Duration::from_millis(10)));
        assert_eq!(merged.redirect, Some(RedirectMode::Manual));
        assert_eq!(merged.referrer.as_deref(), Some("https://ref.test/"));
    }

    #[test]
    fn test_explicit_no_body_overrides_lower_layer() {
        let defaults = RequestConfig::new().body("default-body");

        let unset = merge_config(&defaults, &RequestConfig::new());
        assert_eq!(unset.body, Some(Body::Text("default-body".to_string())));

        let cleared = merge_config(&defaults, &RequestConfig::new().no_body());
        assert_eq!(cleared.body, Some(Body::Empty));
    }

    #[test]
    fn test_merge_is_a_snapshot() {
        let a = RequestConfig::new().header("a", "1");
        let mut merged = merge_config(&a, &RequestConfig::new());
        merged.headers.insert("a", "changed");
        assert_eq!(a.headers.get("a"), Some("1"));
    }

    #[test]
    fn test_merge_interceptors_dedups() {
        let f = request_interceptor("f", |r| async move { Ok(r) });
        let g = request_interceptor("g", |r| async move { Ok(r) });
        let h = request_interceptor("h", |r| async move { Ok(r) });
        let a = InterceptorBundle::new().with_request(f).with_request(g.clone());
        let b = InterceptorBundle::new().with_request(g).with_request(h);
        assert_eq!(merge_interceptors(&a, &b).request_names(), vec!["f", "g", "h"]);
    }
}
