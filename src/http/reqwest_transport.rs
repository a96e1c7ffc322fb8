//! Network transport backed by `reqwest`.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE, REFERER};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, RequestBuilder, Url};
use tokio_util::sync::CancellationToken;

use super::request::HttpRequest;
use super::transport::{BodySource, RawResponse, Transport};
use crate::config::{Body, CacheMode, RedirectMode, ReferrerPolicy, DEFAULT_USER_AGENT};
use crate::error_handling::{InitializationError, TransportError};

/// Maximum redirects followed in `follow` mode.
const MAX_REDIRECT_HOPS: usize = 20;

/// [`Transport`] issuing real HTTP requests.
///
/// Redirect handling is a client-wide setting in reqwest, so one client is kept per
/// [`RedirectMode`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    follow: Client,
    manual: Client,
    error: Client,
}

impl ReqwestTransport {
    /// Builds the three clients with the default User-Agent.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if a client cannot be built.
    pub fn new() -> Result<Self, InitializationError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    /// Builds the three clients with a custom User-Agent.
    pub fn with_user_agent(user_agent: &str) -> Result<Self, InitializationError> {
        Ok(Self {
            follow: build_client(user_agent, Policy::limited(MAX_REDIRECT_HOPS))?,
            manual: build_client(user_agent, Policy::none())?,
            error: build_client(
                user_agent,
                Policy::custom(|attempt| attempt.error("redirect refused: redirect mode is 'error'")),
            )?,
        })
    }

    fn client_for(&self, mode: RedirectMode) -> &Client {
        match mode {
            RedirectMode::Follow => &self.follow,
            RedirectMode::Manual => &self.manual,
            RedirectMode::Error => &self.error,
        }
    }
}

fn build_client(user_agent: &str, policy: Policy) -> Result<Client, reqwest::Error> {
    ClientBuilder::new()
        .redirect(policy)
        .user_agent(user_agent)
        .build()
}

/// `cache-control` value standing in for a fetch cache mode, if any.
fn cache_control_for(mode: CacheMode) -> Option<&'static str> {
    match mode {
        CacheMode::Default => None,
        CacheMode::NoStore | CacheMode::NoCache | CacheMode::Reload => Some("no-cache"),
        CacheMode::ForceCache | CacheMode::OnlyIfCached => Some("max-stale"),
    }
}

/// `referer` value sent to `target` under `policy`, if any.
fn referer_for(policy: ReferrerPolicy, referrer: &Url, target: &Url) -> Option<String> {
    let mut full = referrer.clone();
    full.set_fragment(None);
    let _ = full.set_username("");
    let _ = full.set_password(None);
    let full = full.to_string();
    let origin = format!("{}/", referrer.origin().ascii_serialization());

    let same_origin = referrer.origin() == target.origin();
    let downgrade = referrer.scheme() == "https" && target.scheme() != "https";

    match policy {
        ReferrerPolicy::NoReferrer => None,
        ReferrerPolicy::Unset | ReferrerPolicy::UnsafeUrl => Some(full),
        ReferrerPolicy::NoReferrerWhenDowngrade => (!downgrade).then_some(full),
        ReferrerPolicy::Origin => Some(origin),
        ReferrerPolicy::OriginWhenCrossOrigin => Some(if same_origin { full } else { origin }),
        ReferrerPolicy::SameOrigin => same_origin.then_some(full),
        ReferrerPolicy::StrictOrigin => (!downgrade).then_some(origin),
        ReferrerPolicy::StrictOriginWhenCrossOrigin if same_origin => Some(full),
        ReferrerPolicy::StrictOriginWhenCrossOrigin => (!downgrade).then_some(origin),
    }
}

fn apply_fetch_options(mut builder: RequestBuilder, request: &HttpRequest) -> RequestBuilder {
    let options = request.options();

    if !request.headers().contains_key(CACHE_CONTROL) {
        if let Some(value) = cache_control_for(options.cache) {
            builder = builder.header(CACHE_CONTROL, HeaderValue::from_static(value));
        }
    }

    if !options.referrer.is_empty() && !request.headers().contains_key(REFERER) {
        match Url::parse(&options.referrer) {
            Ok(referrer) => {
                if let Some(value) = referer_for(options.referrer_policy, &referrer, request.url())
                    .and_then(|value| HeaderValue::from_str(&value).ok())
                {
                    builder = builder.header(REFERER, value);
                }
            }
            Err(e) => debug!("Ignoring unusable referrer '{}': {}", options.referrer, e),
        }
    }

    debug!(
        "Fetch options without a native-client equivalent: mode={}, credentials={:?}, integrity={:?}, keepalive={}",
        options.mode, options.credentials, options.integrity, options.keepalive
    );
    builder
}

fn apply_body(builder: RequestBuilder, request: &HttpRequest) -> RequestBuilder {
    match request.body() {
        None | Some(Body::Empty) => builder,
        Some(Body::Text(text)) => builder.body(text.clone()),
        Some(Body::Bytes(bytes)) => builder.body(bytes.clone()),
        Some(Body::Form(pairs)) => {
            let encoded = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            let builder = if request.headers().contains_key(CONTENT_TYPE) {
                builder
            } else {
                builder.header(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                )
            };
            builder.body(encoded)
        }
    }
}

/// Awaits `future` unless `signal` fires first.
async fn abortable<T, F>(signal: Option<CancellationToken>, future: F) -> Result<T, TransportError>
where
    F: std::future::Future<Output = Result<T, reqwest::Error>>,
{
    match signal {
        Some(signal) => tokio::select! {
            _ = signal.cancelled() => Err(TransportError::Aborted),
            result = future => result.map_err(TransportError::from),
        },
        None => future.await.map_err(TransportError::from),
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let options = request.options();
        let client = self.client_for(options.redirect);

        let builder = client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());
        let builder = apply_fetch_options(builder, request);
        let builder = apply_body(builder, request);

        debug!("Sending {} {}", request.method(), request.url());
        let response = abortable(options.signal.clone(), builder.send()).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        debug!("Received {} from {}", status, url);

        let signal = options.signal.clone();
        let body = BodySource::new(async move { abortable(signal, response.bytes()).await });
        Ok(RawResponse::new(status, headers, url, body))
    }
}
