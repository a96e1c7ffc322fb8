//! Logger initialization.
//!
//! Installs `env_logger` with a plain (colored) or JSON line format.

use std::io::Write;

use colored::*;
use log::{Level, LevelFilter, Record};

use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Dependencies whose logs are capped regardless of the requested level.
const NOISY_MODULES: &[(&str, LevelFilter)] = &[
    ("html5ever", LevelFilter::Error),
    ("selectors", LevelFilter::Warn),
    ("rustls", LevelFilter::Warn),
    ("reqwest", LevelFilter::Info),
    ("hyper", LevelFilter::Info),
    ("hyper_util", LevelFilter::Info),
];

/// Initializes the logger with the specified level and format.
///
/// `RUST_LOG` is read first and `level` overrides it, so `RUST_LOG=debug` works for
/// quick debugging while `--log-level` stays authoritative. Parser and HTTP stack
/// internals are capped (see `NOISY_MODULES`) so `debug` shows the send pipeline
/// rather than connection chatter.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=debug interfetch https://example.com/
/// RUST_LOG=debug interfetch https://example.com/ --log-level info
/// RUST_LOG=interfetch::client=debug,reqwest=info interfetch https://example.com/
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    for (module, cap) in NOISY_MODULES {
        builder.filter_module(module, (*cap).min(level));
    }
    builder.filter_module("interfetch", level);

    match format {
        LogFormat::Json => builder.format(|buf, record| writeln!(buf, "{}", json_line(record))),
        LogFormat::Plain => builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {} [{}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                record.target().cyan(),
                colored_level(record.level()),
                record.args()
            )
        }),
    };

    // try_init so a second initialization (tests) is an error, not a panic
    builder.try_init()?;
    Ok(())
}

fn colored_level(level: Level) -> ColoredString {
    let label = level.to_string();
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.purple(),
    }
}

fn json_line(record: &Record<'_>) -> String {
    serde_json::json!({
        "ts": chrono::Utc::now().timestamp_millis(),
        "level": record.level().as_str(),
        "target": record.target(),
        "msg": record.args().to_string(),
    })
    .to_string()
}
