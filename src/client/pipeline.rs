//! The send pipeline.
//!
//! One send runs these stages strictly in sequence, stopping at the first failure:
//! merge, validate, build request, request interceptors, transport, build response,
//! status check, body resolution plus response interceptors, delay.

use std::sync::Arc;

use log::{debug, info};

use super::merge::{merge_config, merge_interceptors};
use crate::config::RequestConfig;
use crate::error_handling::{RequestFailedError, Result};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::interceptor::InterceptorBundle;
use crate::schema::{ConfigSchema, InterceptorsSchema};

pub(super) async fn execute(
    transport: &Arc<dyn Transport>,
    defaults: &RequestConfig,
    baseline: &InterceptorBundle,
    config: &RequestConfig,
    interceptors: &InterceptorBundle,
) -> Result<HttpResponse> {
    let merged = merge_config(defaults, config);
    let bundle = merge_interceptors(baseline, interceptors);
    if bundle.is_empty() {
        debug!("Merged configuration ({} headers), no interceptors", merged.headers.len());
    } else {
        debug!(
            "Merged configuration ({} headers) and {:?}",
            merged.headers.len(),
            bundle
        );
    }

    let validated = ConfigSchema::global().parse(merged)?;
    let bundle = InterceptorsSchema::parse(bundle)?;
    debug!("Validated {} {}", validated.method, validated.url);

    let mut request = HttpRequest::from_config(&validated);
    request.interceptors_mut().extend(bundle.request);
    let request = request.intercept().await?;

    debug!("Sending {} {}", request.method(), request.url());
    let raw = transport.fetch(&request).await?;
    let mut response = HttpResponse::new(raw, request);
    debug!("Received {} from {}", response.status(), response.url());

    if !response.ok() {
        info!(
            "Request to {} failed with status {}",
            response.url(),
            response.status()
        );
        return Err(RequestFailedError::new(response).into());
    }

    response.interceptors_mut().extend(bundle.response);
    let response = response.intercept().await?;

    if !validated.delay.is_zero() {
        debug!("Delaying {:?} before returning", validated.delay);
        tokio::time::sleep(validated.delay).await;
    }
    Ok(response)
}
