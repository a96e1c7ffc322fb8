//! Configuration constants.
//!
//! Defaults applied by the configuration schema and the scraper profile, plus the
//! environment variable names read by [`Settings`](super::Settings).

use std::time::Duration;

/// Path used when a configuration never set one.
pub const DEFAULT_PATH: &str = "/";

/// Delay applied after a response has been processed when none is configured.
pub const DEFAULT_DELAY: Duration = Duration::ZERO;

/// Content type forced onto requests that carry a `json` payload without a JSON-like
/// content type.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Content type the scraper profile sends by default.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// User-Agent sent by [`ReqwestTransport`](crate::http::ReqwestTransport) unless the
/// request carries its own.
pub const DEFAULT_USER_AGENT: &str = concat!("interfetch/", env!("CARGO_PKG_VERSION"));

/// Environment variable toggling the scraper page cache.
pub const CACHE_ENV: &str = "INTERFETCH_CACHE";

/// Environment variable overriding the scraper cache directory.
pub const CACHE_DIR_ENV: &str = "INTERFETCH_CACHE_DIR";

/// Cache directory used when [`CACHE_DIR_ENV`] is unset.
pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// File extension of cached pages.
pub const CACHE_FILE_EXTENSION: &str = "html";

/// Cache id used for a path that ends in a separator (including the root path).
pub const CACHE_INDEX_ID: &str = "index";

/// Name of the built-in root profile.
pub const HTTP_PROFILE: &str = "http";

/// Name of the built-in scraper profile (child of [`HTTP_PROFILE`]).
pub const SCRAPER_PROFILE: &str = "scraper";
