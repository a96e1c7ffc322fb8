//! Validation, defaulting and coercion of a merged [`RequestConfig`].

use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use tokio_util::sync::CancellationToken;

use super::rules::FieldRule;
use crate::config::{
    Body, CacheMode, CorsMode, CredentialsMode, Headers, HttpMethod, JsonPayload, RedirectMode,
    ReferrerPolicy, RequestConfig, DEFAULT_DELAY, DEFAULT_PATH, HEADER_CONTENT_TYPE,
    JSON_CONTENT_TYPE,
};
use crate::error_handling::{FieldIssue, ValidationError};
use crate::http::is_json_content_type;

/// A configuration after validation: every field concrete, one physical body, and
/// the request URL composed from `origin + path`.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub cache: CacheMode,
    pub credentials: Option<CredentialsMode>,
    pub delay: Duration,
    pub headers: HeaderMap,
    pub integrity: Option<String>,
    pub keepalive: bool,
    pub mode: CorsMode,
    pub redirect: RedirectMode,
    pub referrer: String,
    pub referrer_policy: ReferrerPolicy,
    pub signal: Option<CancellationToken>,
    /// Origin without a trailing slash.
    pub origin: Option<String>,
    /// Path, always starting with `/`.
    pub path: String,
    pub method: HttpMethod,
    /// `json` serialized, or the configured body.
    pub body: Option<Body>,
    pub url: Url,
}

/// Field rules for [`RequestConfig`].
pub struct ConfigSchema {
    cache: FieldRule<CacheMode>,
    credentials: FieldRule<CredentialsMode>,
    delay: FieldRule<Duration>,
    integrity: FieldRule<String>,
    keepalive: FieldRule<bool>,
    mode: FieldRule<CorsMode>,
    redirect: FieldRule<RedirectMode>,
    referrer: FieldRule<String>,
    referrer_policy: FieldRule<ReferrerPolicy>,
    origin: FieldRule<String>,
    path: FieldRule<String>,
    method: FieldRule<String, HttpMethod>,
    json: FieldRule<JsonPayload, String>,
}

static CONFIG_SCHEMA: LazyLock<ConfigSchema> = LazyLock::new(ConfigSchema::new);

impl Default for ConfigSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSchema {
    pub fn new() -> Self {
        Self {
            cache: FieldRule::new("cache").default_to(CacheMode::default),
            credentials: FieldRule::new("credentials"),
            delay: FieldRule::new("delay").default_to(|| DEFAULT_DELAY),
            integrity: FieldRule::new("integrity"),
            keepalive: FieldRule::new("keepalive").default_to(|| false),
            mode: FieldRule::new("mode").default_to(CorsMode::default),
            redirect: FieldRule::new("redirect").default_to(RedirectMode::default),
            referrer: FieldRule::new("referrer").default_to(String::new),
            referrer_policy: FieldRule::new("referrerPolicy").default_to(ReferrerPolicy::default),
            origin: FieldRule::converting("origin", normalize_origin),
            path: FieldRule::new("path")
                .default_to(|| DEFAULT_PATH.to_string())
                .check(|path| path.starts_with('/'), "must start with '/'"),
            method: FieldRule::converting("method", parse_method)
                .default_to(|| HttpMethod::default().to_string()),
            json: FieldRule::converting("json", serialize_json),
        }
    }

    /// The shared schema instance.
    pub fn global() -> &'static ConfigSchema {
        &CONFIG_SCHEMA
    }

    /// Validates `config`, filling defaults and coercing `json` into the body.
    ///
    /// # Errors
    ///
    /// Returns every rule violation at once as a [`ValidationError`].
    pub fn parse(&self, config: RequestConfig) -> Result<ValidatedConfig, ValidationError> {
        let mut issues = Vec::new();

        let cache = self.cache.apply(config.cache, &mut issues);
        let credentials = self.credentials.apply(config.credentials, &mut issues);
        let delay = self.delay.apply(config.delay, &mut issues);
        let integrity = self.integrity.apply(config.integrity, &mut issues);
        let keepalive = self.keepalive.apply(config.keepalive, &mut issues);
        let mode = self.mode.apply(config.mode, &mut issues);
        let redirect = self.redirect.apply(config.redirect, &mut issues);
        let referrer = self.referrer.apply(config.referrer, &mut issues);
        let referrer_policy = self.referrer_policy.apply(config.referrer_policy, &mut issues);
        let origin = self.origin.apply(config.origin, &mut issues);
        let path = self.path.apply(config.path, &mut issues);
        let method = self.method.apply(config.method, &mut issues);
        let json = self.json.apply(config.json, &mut issues);

        let mut headers = config.headers;
        let body = match json {
            Some(serialized) => {
                let json_like = headers
                    .get(HEADER_CONTENT_TYPE)
                    .is_some_and(is_json_content_type);
                if !json_like {
                    headers.insert(HEADER_CONTENT_TYPE, JSON_CONTENT_TYPE);
                }
                Some(Body::Text(serialized))
            }
            None => config.body.filter(|body| *body != Body::Empty),
        };
        let headers = to_header_map(&headers, &mut issues);
        let url = compose_url(origin.as_deref(), path.as_deref(), &mut issues);

        match (
            cache,
            delay,
            keepalive,
            mode,
            redirect,
            referrer,
            referrer_policy,
            path,
            method,
            url,
        ) {
            (
                Some(cache),
                Some(delay),
                Some(keepalive),
                Some(mode),
                Some(redirect),
                Some(referrer),
                Some(referrer_policy),
                Some(path),
                Some(method),
                Some(url),
            ) if issues.is_empty() => Ok(ValidatedConfig {
                cache,
                credentials,
                delay,
                headers,
                integrity,
                keepalive,
                mode,
                redirect,
                referrer,
                referrer_policy,
                signal: config.signal,
                origin,
                path,
                method,
                body,
                url,
            }),
            _ => Err(ValidationError::from_issues(issues)),
        }
    }
}

fn normalize_origin(origin: String) -> Result<String, String> {
    let trimmed = origin.trim().trim_end_matches('/').to_string();
    let url = Url::parse(&trimmed).map_err(|e| format!("'{origin}' is not an absolute URL: {e}"))?;
    if url.cannot_be_a_base() || !url.has_host() {
        return Err(format!("'{origin}' is not an absolute URL with a host"));
    }
    Ok(trimmed)
}

fn parse_method(method: String) -> Result<HttpMethod, String> {
    HttpMethod::from_str(method.trim()).map_err(|_| format!("unsupported HTTP method '{method}'"))
}

fn serialize_json(json: JsonPayload) -> Result<String, String> {
    match json {
        JsonPayload::Value(value) => {
            serde_json::to_string(&value).map_err(|e| format!("cannot serialize JSON: {e}"))
        }
        JsonPayload::Raw(raw) => serde_json::from_str::<serde_json::Value>(&raw)
            .map(|_| raw)
            .map_err(|e| format!("is not valid JSON: {e}")),
    }
}

fn to_header_map(headers: &Headers, issues: &mut Vec<FieldIssue>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let field = format!("headers.{name}");
        let header_name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(header_name) => header_name,
            Err(e) => {
                issues.push(FieldIssue {
                    field,
                    message: format!("invalid header name: {e}"),
                });
                continue;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(header_value) => {
                map.insert(header_name, header_value);
            }
            Err(e) => issues.push(FieldIssue {
                field,
                message: format!("invalid header value: {e}"),
            }),
        }
    }
    map
}

fn compose_url(
    origin: Option<&str>,
    path: Option<&str>,
    issues: &mut Vec<FieldIssue>,
) -> Option<Url> {
    let path = path?;
    let Some(origin) = origin else {
        issues.push(FieldIssue {
            field: "origin".to_string(),
            message: "is required to build an absolute request URL".to_string(),
        });
        return None;
    };
    match Url::parse(&format!("{origin}{path}")) {
        Ok(url) => Some(url),
        Err(e) => {
            issues.push(FieldIssue {
                field: "path".to_string(),
                message: format!("does not form a valid URL with the origin: {e}"),
            });
            None
        }
    }
}
