//! HTML scraping client.

use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use super::cache::{cache_id, CacheStore, FsCache};
use super::document::{DocumentLoader, HtmlLoader};
use crate::client::{merge_config, HttpClient, Profile};
use crate::config::{settings, RequestConfig, Settings};
use crate::error_handling::Result;
use crate::http::Transport;
use crate::interceptor::InterceptorBundle;
use crate::schema::ConfigSchema;

/// Raw HTML and the document loaded from it.
#[derive(Debug, Clone)]
pub struct ScrapeResult<D> {
    pub source: String,
    pub document: D,
}

/// A client of the `scraper` profile that loads responses as documents.
///
/// With the cache enabled every scraped page is written to the cache under the id
/// derived from its request path, and [`lookup`](Self::lookup) serves pages from the
/// cache without touching the network.
pub struct Scraper<L: DocumentLoader = HtmlLoader> {
    client: HttpClient,
    loader: Arc<L>,
    cache: Option<Arc<dyn CacheStore>>,
}

impl Scraper<HtmlLoader> {
    /// Creates a scraper using the process-wide [`Settings`].
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self> {
        Self::with_settings(transport, settings())
    }

    /// Creates a scraper from explicit settings; an [`FsCache`] on
    /// `settings.cache_dir` is attached when `settings.cache_enabled` is set.
    pub fn with_settings(transport: Arc<dyn Transport>, settings: &Settings) -> Result<Self> {
        let client =
            Profile::scraper().create(transport, RequestConfig::new(), InterceptorBundle::new())?;
        let cache = settings.cache_enabled.then(|| {
            debug!("Page cache enabled in {}", settings.cache_dir.display());
            Arc::new(FsCache::new(&settings.cache_dir)) as Arc<dyn CacheStore>
        });
        Ok(Self {
            client,
            loader: Arc::new(HtmlLoader),
            cache,
        })
    }
}

impl<L: DocumentLoader> Scraper<L> {
    /// Replaces the document loader.
    pub fn with_loader<M: DocumentLoader>(self, loader: M) -> Scraper<M> {
        Scraper {
            client: self.client,
            loader: Arc::new(loader),
            cache: self.cache,
        }
    }

    /// Attaches a cache store, enabling the cache.
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut HttpClient {
        &mut self.client
    }

    /// Fetches a page and loads it.
    ///
    /// # Errors
    ///
    /// Everything [`HttpClient::send`] returns, plus [`Error::Cache`](crate::Error::Cache)
    /// if the page cannot be written to an enabled cache.
    pub async fn scrape(&self, config: RequestConfig) -> Result<ScrapeResult<L::Document>> {
        let mut response = self.client.send(config, InterceptorBundle::new()).await?;
        let source = response.text().await?.to_string();

        if let Some(cache) = &self.cache {
            let id = cache_id(response.request().url().path())?;
            cache.write(&id, &source)?;
        }

        Ok(self.load(source))
    }

    /// Serves the page cached under `id` without a network request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cache`](crate::Error::Cache) if the cache is disabled, the id
    /// is invalid, or nothing is stored under it.
    pub fn lookup(&self, id: &str) -> Result<ScrapeResult<L::Document>> {
        let cache = self.cache.as_ref().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Unsupported, "page cache is disabled")
        })?;
        let id = cache_id(id)?;
        let source = cache.read(&id)?;
        Ok(self.load(source))
    }

    /// Serves the page from the cache when it holds an entry for the request path,
    /// and scrapes it otherwise.
    pub async fn scrape_cached(&self, config: RequestConfig) -> Result<ScrapeResult<L::Document>> {
        if let Some(cache) = &self.cache {
            let validated =
                ConfigSchema::global().parse(merge_config(self.client.defaults(), &config))?;
            let id = cache_id(validated.url.path())?;
            if cache.contains(&id) {
                info!("Serving {} from cache entry '{}'", validated.url, id);
                return Ok(self.load(cache.read(&id)?));
            }
        }
        self.scrape(config).await
    }

    /// Derives an independent scraper; see [`HttpClient::fork`].
    pub fn fork(&self, config: &RequestConfig, interceptors: &InterceptorBundle) -> Self {
        Self {
            client: self.client.fork(config, interceptors),
            loader: Arc::clone(&self.loader),
            cache: self.cache.clone(),
        }
    }

    fn load(&self, source: String) -> ScrapeResult<L::Document> {
        let document = self.loader.load(&source);
        ScrapeResult { source, document }
    }
}

impl<L: DocumentLoader> Clone for Scraper<L> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            loader: Arc::clone(&self.loader),
            cache: self.cache.clone(),
        }
    }
}

impl<L: DocumentLoader> fmt::Debug for Scraper<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scraper")
            .field("client", &self.client)
            .field("cache_enabled", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
