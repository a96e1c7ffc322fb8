//! HTTP client orchestration.
//!
//! This module provides:
//! - The configuration and interceptor merge algorithms
//! - Profiles: named baselines arranged in a lineage, kept in a process-wide registry
//! - [`HttpClient`]: a profile baseline snapshot plus a transport, with send and fork

mod merge;
mod pipeline;
mod profile;

use std::fmt;
use std::sync::Arc;

use crate::config::{HttpMethod, RequestConfig};
use crate::error_handling::Result;
use crate::http::{HttpResponse, Transport};
use crate::interceptor::InterceptorBundle;

pub use merge::{merge_config, merge_interceptors};
pub use profile::{reset_registry, Profile};

/// A client bound to a profile and a transport.
///
/// The defaults and interceptors are a snapshot taken when the client was created
/// or forked. Changing them affects this client only, and later changes to the
/// profile baseline do not reach it.
///
/// Cloning is cheap apart from the snapshot; clones share the transport.
#[derive(Clone)]
pub struct HttpClient {
    profile: Profile,
    defaults: RequestConfig,
    interceptors: InterceptorBundle,
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    /// Creates a client of the root `http` profile with its baseline as defaults.
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self> {
        Profile::http().create(transport, RequestConfig::new(), InterceptorBundle::new())
    }

    pub(crate) fn from_parts(
        profile: Profile,
        defaults: RequestConfig,
        interceptors: InterceptorBundle,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            profile,
            defaults,
            interceptors,
            transport,
        }
    }

    /// The lineage descriptor this client was created from.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn defaults(&self) -> &RequestConfig {
        &self.defaults
    }

    pub fn defaults_mut(&mut self) -> &mut RequestConfig {
        &mut self.defaults
    }

    pub fn interceptors(&self) -> &InterceptorBundle {
        &self.interceptors
    }

    pub fn interceptors_mut(&mut self) -> &mut InterceptorBundle {
        &mut self.interceptors
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Sends one request.
    ///
    /// `config` and `interceptors` are merged over this client's defaults, validated,
    /// and run through the pipeline. Response interceptors see a resolved body.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`](crate::Error::Validation) before any network activity
    /// - [`Error::Interceptor`](crate::Error::Interceptor) if an interceptor fails
    /// - [`Error::Transport`](crate::Error::Transport), unchanged from the transport
    /// - [`Error::RequestFailed`](crate::Error::RequestFailed) for a non-2xx status;
    ///   response interceptors do not run in that case
    /// - [`Error::Decode`](crate::Error::Decode) for a JSON response that does not parse
    pub async fn send(
        &self,
        config: RequestConfig,
        interceptors: InterceptorBundle,
    ) -> Result<HttpResponse> {
        pipeline::execute(
            &self.transport,
            &self.defaults,
            &self.interceptors,
            &config,
            &interceptors,
        )
        .await
    }

    /// [`send`](Self::send) with the method forced to `GET`.
    pub async fn get(
        &self,
        config: RequestConfig,
        interceptors: InterceptorBundle,
    ) -> Result<HttpResponse> {
        self.send(config.method(HttpMethod::Get.as_ref()), interceptors)
            .await
    }

    /// [`send`](Self::send) with the method forced to `POST`.
    pub async fn post(
        &self,
        config: RequestConfig,
        interceptors: InterceptorBundle,
    ) -> Result<HttpResponse> {
        self.send(config.method(HttpMethod::Post.as_ref()), interceptors)
            .await
    }

    /// Derives an independent client of the same profile whose defaults and
    /// interceptors are this client's merged with the given overrides.
    pub fn fork(&self, config: &RequestConfig, interceptors: &InterceptorBundle) -> HttpClient {
        HttpClient {
            profile: self.profile.clone(),
            defaults: self.profile.merge_config(&self.defaults, config),
            interceptors: self
                .profile
                .merge_interceptors(&self.interceptors, interceptors),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("profile", &self.profile.name())
            .field("defaults", &self.defaults)
            .field("interceptors", &self.interceptors)
            .finish_non_exhaustive()
    }
}
