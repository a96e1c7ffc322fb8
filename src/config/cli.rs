//! Command-line options.

use std::time::Duration;

use clap::Parser;
use url::{Position, Url};

use super::constants::DEFAULT_USER_AGENT;
use super::types::{LogFormat, LogLevel, RequestConfig};
use crate::error_handling::ValidationError;

/// Command-line options of the `interfetch` binary.
///
/// # Examples
///
/// ```bash
/// # Print the page title
/// interfetch https://example.com/
///
/// # Print the text of every matching element, with an extra header
/// interfetch https://example.com/docs/ --selector "h2" --header "Accept-Language:en"
///
/// # Serve from (and fill) the page cache in INTERFETCH_CACHE_DIR
/// INTERFETCH_CACHE=1 interfetch https://example.com/docs/ --cached
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "interfetch",
    about = "Fetches a page through the scraper profile and prints its title or selected text."
)]
pub struct Opt {
    /// Absolute URL to fetch
    pub url: String,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// CSS selector; the text of every match is printed instead of the title
    #[arg(long)]
    pub selector: Option<String>,

    /// Extra request header as NAME:VALUE (repeatable)
    #[arg(long = "header", value_parser = parse_header_arg)]
    pub headers: Vec<(String, String)>,

    /// Milliseconds to wait after the response is processed
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Serve the page from the cache when present (requires INTERFETCH_CACHE)
    #[arg(long)]
    pub cached: bool,
}

impl Opt {
    /// The request described by the options: `url` split into origin and path,
    /// plus headers and delay.
    pub fn request_config(&self) -> Result<RequestConfig, ValidationError> {
        let url = Url::parse(&self.url)
            .map_err(|e| ValidationError::new("url", format!("invalid URL '{}': {e}", self.url)))?;
        if !url.has_host() {
            return Err(ValidationError::new("url", "URL must have a host"));
        }

        let mut config = RequestConfig::new()
            .origin(url.origin().ascii_serialization())
            .path(&url[Position::BeforePath..])
            .delay(Duration::from_millis(self.delay_ms));
        for (name, value) in &self.headers {
            config = config.header(name.as_str(), value.as_str());
        }
        Ok(config)
    }
}

fn parse_header_arg(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header name is empty in '{arg}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_config_splits_url() {
        let opt = Opt::parse_from([
            "interfetch",
            "https://example.com:8443/docs/a?q=1",
            "--header",
            "X-Test: yes",
            "--delay-ms",
            "25",
        ]);
        let config = opt.request_config().unwrap();
        assert_eq!(config.origin.as_deref(), Some("https://example.com:8443"));
        assert_eq!(config.path.as_deref(), Some("/docs/a?q=1"));
        assert_eq!(config.headers.get("x-test"), Some("yes"));
        assert_eq!(config.delay, Some(Duration::from_millis(25)));
    }

    #[test]
    fn test_request_config_rejects_relative_url() {
        let opt = Opt::parse_from(["interfetch", "/docs"]);
        assert!(opt.request_config().unwrap_err().has_field("url"));
    }

    #[test]
    fn test_parse_header_arg() {
        assert_eq!(
            parse_header_arg("Accept: text/html").unwrap(),
            ("Accept".to_string(), "text/html".to_string())
        );
        assert!(parse_header_arg("no-colon").is_err());
        assert!(parse_header_arg(":value").is_err());
    }
}
