//! HTML scraping on top of the HTTP client.
//!
//! This module provides:
//! - [`Scraper`]: a client of the `scraper` profile returning loaded documents
//! - [`HtmlDocument`]: CSS-selector queries over fetched HTML
//! - [`FsCache`] and [`cache_id`]: the on-disk page cache keyed by URL path

mod cache;
mod client;
mod document;
mod selector;

pub use cache::{cache_id, CacheStore, FsCache};
pub use client::{ScrapeResult, Scraper};
pub use document::{DocumentLoader, HtmlDocument, HtmlLoader};
pub use selector::parse_selector;
