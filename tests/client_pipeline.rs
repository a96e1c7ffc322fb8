//! End-to-end tests of the send pipeline against a stub transport.

mod helpers;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;

use helpers::StubTransport;
use interfetch::config::{HTML_CONTENT_TYPE, JSON_CONTENT_TYPE};
use interfetch::{
    request_interceptor, response_interceptor, Error, HttpClient, InterceptorBundle, Profile,
    RequestConfig,
};

fn no_interceptors() -> InterceptorBundle {
    InterceptorBundle::new()
}

#[tokio::test]
async fn test_json_response_end_to_end() {
    let transport = StubTransport::json(r#"{"n":5}"#);
    let client = HttpClient::new(transport.clone()).unwrap();

    let response = client
        .send(
            RequestConfig::new()
                .origin("https://x.test")
                .path("/items")
                .method("get"),
            no_interceptors(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.data(), Some(&json!({"n": 5})));
    assert_eq!(response.content(), Some(r#"{"n":5}"#));

    let recorded = transport.last_request();
    assert_eq!(recorded.method, "GET");
    assert_eq!(recorded.url, "https://x.test/items");
}

#[tokio::test]
async fn test_failed_status_skips_response_interceptors() {
    let transport = StubTransport::new(404, Some("text/plain"), "missing");
    let client = HttpClient::new(transport).unwrap();
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);

    let result = client
        .send(
            RequestConfig::new().origin("https://x.test").path("/gone"),
            InterceptorBundle::new().with_response(response_interceptor("mark", move |r| {
                let flag = Arc::clone(&flag);
                async move {
                    flag.store(true, Ordering::SeqCst);
                    Ok(r)
                }
            })),
        )
        .await;

    match result {
        Err(Error::RequestFailed(mut failure)) => {
            assert_eq!(failure.response().status(), 404);
            assert!(!failure.response().is_resolved());
            assert_eq!(failure.response_mut().text().await.unwrap(), "missing");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
    assert!(!ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_request_interceptors_run_in_order_and_see_earlier_mutations() {
    let transport = StubTransport::json("{}");
    let client = HttpClient::new(transport.clone()).unwrap();

    let first = request_interceptor("first", |mut request| async move {
        request.set_header("x-trail", "first")?;
        Ok::<_, anyhow::Error>(request)
    });
    let second = request_interceptor("second", |mut request| async move {
        let trail = format!("{},second", request.header("x-trail").unwrap_or("none"));
        request.set_header("x-trail", &trail)?;
        Ok::<_, anyhow::Error>(request)
    });

    client
        .send(
            RequestConfig::new().origin("https://x.test"),
            InterceptorBundle::new()
                .with_request(first)
                .with_request(second),
        )
        .await
        .unwrap();

    let recorded = transport.last_request();
    assert_eq!(recorded.headers["x-trail"], "first,second");
    assert_eq!(recorded.url, "https://x.test/");
}

#[tokio::test]
async fn test_shared_interceptor_runs_once() {
    let transport = StubTransport::json("{}");
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let count = request_interceptor("count", move |request| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(request)
        }
    });

    let client = HttpClient::new(transport)
        .unwrap()
        .fork(
            &RequestConfig::new().origin("https://x.test"),
            &InterceptorBundle::new().with_request(count.clone()),
        );
    client
        .send(
            RequestConfig::new(),
            InterceptorBundle::new().with_request(count),
        )
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_json_payload_is_serialized_with_json_content_type() {
    let transport = StubTransport::json("{}");
    let client = HttpClient::new(transport.clone()).unwrap();

    client
        .post(
            RequestConfig::new()
                .origin("https://x.test/")
                .path("/items")
                .json(json!({"x": 1}))
                .body("ignored"),
            no_interceptors(),
        )
        .await
        .unwrap();

    let recorded = transport.last_request();
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.body.as_deref(), Some(r#"{"x":1}"#));
    assert_eq!(recorded.headers["content-type"], JSON_CONTENT_TYPE);
}

#[tokio::test]
async fn test_call_can_clear_default_body() {
    let transport = StubTransport::json("{}");
    let client = HttpClient::new(transport.clone()).unwrap().fork(
        &RequestConfig::new().origin("https://x.test").body("default-body"),
        &no_interceptors(),
    );

    client.post(RequestConfig::new(), no_interceptors()).await.unwrap();
    assert_eq!(transport.last_request().body.as_deref(), Some("default-body"));

    client
        .post(RequestConfig::new().no_body(), no_interceptors())
        .await
        .unwrap();
    assert_eq!(transport.last_request().body, None);
}

#[tokio::test]
async fn test_get_forces_method() {
    let transport = StubTransport::json("{}");
    let client = HttpClient::new(transport.clone()).unwrap();

    client
        .get(
            RequestConfig::new().origin("https://x.test").method("DELETE"),
            no_interceptors(),
        )
        .await
        .unwrap();

    assert_eq!(transport.last_request().method, "GET");
}

#[tokio::test]
async fn test_validation_fails_before_network() {
    let transport = StubTransport::json("{}");
    let client = HttpClient::new(transport.clone()).unwrap();

    let result = client
        .send(
            RequestConfig::new()
                .origin("https://x.test")
                .path("items")
                .method("fetch"),
            no_interceptors(),
        )
        .await;

    match result {
        Err(Error::Validation(err)) => {
            assert!(err.has_field("path"));
            assert!(err.has_field("method"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_anonymous_interceptor_is_rejected() {
    let transport = StubTransport::json("{}");
    let client = HttpClient::new(transport.clone()).unwrap();

    let result = client
        .send(
            RequestConfig::new().origin("https://x.test"),
            InterceptorBundle::new().with_request(request_interceptor("", |r| async move { Ok(r) })),
        )
        .await;

    assert!(matches!(result, Err(Error::Validation(err)) if err.has_field("request[0]")));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_interceptor_error_names_the_interceptor() {
    let transport = StubTransport::json("{}");
    let client = HttpClient::new(transport.clone()).unwrap();

    let result = client
        .send(
            RequestConfig::new().origin("https://x.test"),
            InterceptorBundle::new().with_request(request_interceptor("deny", |_| async move {
                Err::<interfetch::HttpRequest, _>(anyhow::anyhow!("not allowed"))
            })),
        )
        .await;

    match result {
        Err(Error::Interceptor { name, source }) => {
            assert_eq!(name, "deny");
            assert_eq!(source.to_string(), "not allowed");
        }
        other => panic!("expected Interceptor, got {other:?}"),
    }
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_response_interceptors_see_resolved_body() {
    let transport = StubTransport::json(r#"{"n":5}"#);
    let client = HttpClient::new(transport.clone()).unwrap();

    let double = response_interceptor("double", |mut response| async move {
        let n = response
            .data()
            .and_then(|data| data["n"].as_i64())
            .ok_or_else(|| anyhow::anyhow!("missing n"))?;
        response.set_data(Some(json!({ "n": n * 2 })));
        Ok::<_, anyhow::Error>(response)
    });

    let mut response = client
        .send(
            RequestConfig::new().origin("https://x.test"),
            InterceptorBundle::new().with_response(double),
        )
        .await
        .unwrap();

    assert_eq!(response.json().await.unwrap(), Some(&json!({"n": 10})));
    assert_eq!(response.text().await.unwrap(), r#"{"n":5}"#);
    assert_eq!(transport.body_reads(), 1);
}

#[tokio::test]
async fn test_invalid_json_body_is_a_decode_error() {
    let transport = StubTransport::json("{not json");
    let client = HttpClient::new(transport).unwrap();

    let result = client
        .send(RequestConfig::new().origin("https://x.test"), no_interceptors())
        .await;

    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[tokio::test]
async fn test_fork_is_independent_of_parent() {
    let transport = StubTransport::json("{}");
    let mut parent = HttpClient::new(transport.clone())
        .unwrap()
        .fork(
            &RequestConfig::new().origin("https://x.test").header("a", "1"),
            &no_interceptors(),
        );
    let child = parent.fork(&RequestConfig::new().header("b", "2"), &no_interceptors());

    assert_eq!(child.defaults().headers.get("a"), Some("1"));
    assert_eq!(child.defaults().headers.get("b"), Some("2"));

    parent.defaults_mut().headers.insert("a", "changed");
    parent.defaults_mut().headers.insert("c", "3");
    assert_eq!(child.defaults().headers.get("a"), Some("1"));
    assert!(!child.defaults().headers.contains("c"));
    assert!(!parent.defaults().headers.contains("b"));

    child.send(RequestConfig::new(), no_interceptors()).await.unwrap();
    let recorded = transport.last_request();
    assert_eq!(recorded.headers["a"], "1");
    assert_eq!(recorded.headers["b"], "2");
    assert_eq!(child.profile(), parent.profile());
}

#[tokio::test]
async fn test_precedence_ladder_through_profile() {
    let transport = StubTransport::json("{}");
    let profile = Profile::register("pipeline-test-ladder", None).unwrap();
    profile
        .define_defaults(
            &RequestConfig::new()
                .origin("https://class.test")
                .path("/class")
                .header("x-layer", "class")
                .header("x-class", "1"),
        )
        .unwrap();

    let client = profile
        .create(
            transport.clone(),
            RequestConfig::new().path("/instance").header("x-layer", "instance"),
            no_interceptors(),
        )
        .unwrap();
    client
        .send(RequestConfig::new().header("X-Layer", "call"), no_interceptors())
        .await
        .unwrap();

    let recorded = transport.last_request();
    assert_eq!(recorded.url, "https://class.test/instance");
    assert_eq!(recorded.headers["x-layer"], "call");
    assert_eq!(recorded.headers["x-class"], "1");
}

#[tokio::test]
async fn test_profile_baseline_is_snapshotted_at_creation() {
    let transport = StubTransport::json("{}");
    let profile = Profile::register("pipeline-test-snapshot", None).unwrap();
    profile
        .define_defaults(&RequestConfig::new().origin("https://x.test").header("v", "1"))
        .unwrap();
    let client = profile
        .create(transport.clone(), RequestConfig::new(), no_interceptors())
        .unwrap();

    profile
        .define_defaults(&RequestConfig::new().header("v", "2"))
        .unwrap();

    client.send(RequestConfig::new(), no_interceptors()).await.unwrap();
    assert_eq!(transport.last_request().headers["v"], "1");
}

#[tokio::test]
async fn test_scraper_profile_sends_html_content_type() {
    let transport = StubTransport::html("<p>hi</p>");
    let client = Profile::scraper()
        .create(
            transport.clone(),
            RequestConfig::new().origin("https://x.test"),
            no_interceptors(),
        )
        .unwrap();

    let response = client.send(RequestConfig::new(), no_interceptors()).await.unwrap();

    assert_eq!(transport.last_request().headers["content-type"], HTML_CONTENT_TYPE);
    assert_eq!(response.content(), Some("<p>hi</p>"));
    assert_eq!(response.data(), None);
}

#[tokio::test]
async fn test_delay_is_applied_before_returning() {
    let transport = StubTransport::json("{}");
    let client = HttpClient::new(transport).unwrap();

    let started = Instant::now();
    client
        .send(
            RequestConfig::new()
                .origin("https://x.test")
                .delay(Duration::from_millis(60)),
            no_interceptors(),
        )
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(60));
}
