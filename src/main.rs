//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `interfetch` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use interfetch::config::Opt;
use interfetch::initialization::{init_logger_with, init_transport};
use interfetch::{HtmlDocument, ScrapeResult, Scraper};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads INTERFETCH_CACHE / INTERFETCH_CACHE_DIR
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(env_path) = exe_path.parent().map(|dir| dir.join(".env")) {
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();
    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(&opt).await {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("interfetch error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(opt: &Opt) -> Result<Vec<String>> {
    let transport =
        init_transport(Some(&opt.user_agent)).context("Failed to initialize HTTP transport")?;
    let scraper = Scraper::new(transport)?;
    let config = opt.request_config()?;

    let ScrapeResult { source, document } = if opt.cached {
        scraper.scrape_cached(config).await?
    } else {
        scraper.scrape(config).await?
    };
    log::debug!("Loaded {} bytes of HTML from {}", source.len(), opt.url);

    render(&document, opt.selector.as_deref())
}

fn render(document: &HtmlDocument, selector: Option<&str>) -> Result<Vec<String>> {
    match selector {
        Some(css) => Ok(document
            .select(css)?
            .into_iter()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect()),
        None => Ok(document.title().into_iter().collect()),
    }
}
