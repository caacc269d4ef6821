//! Tracing configuration for superclip
//!
//! ## Behavior / 行为
//!
//! - Filter comes from `[log].filter`; otherwise debug in development builds and
//!   info in release builds. Environment variables are not consulted.
//! - Always logs to stdout; `[log].file_logging` adds a daily rolling file.

use std::{fs, io, path::Path, sync::OnceLock};

use anyhow::Context;
use sc_core::config::LogConfig;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry, EnvFilter};

const LOG_FILE_PREFIX: &str = "superclip.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default filter directives when the config names none.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    vec![
        level.to_string(),
        format!("sc_infra={level}"),
        format!("sc_platform={level}"),
        format!("sc_app={level}"),
    ]
}

fn build_env_filter(config: &LogConfig) -> anyhow::Result<EnvFilter> {
    match config.filter.as_deref() {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("Invalid log filter: {directives}")),
        None => Ok(EnvFilter::new(build_filter_directives(is_development()).join(","))),
    }
}

/// Initialize the global tracing subscriber.
///
/// `log_dir` is only used when file logging is enabled. A file writer that
/// cannot be created falls back to stdout only.
///
/// ## Errors / 错误
///
/// - A subscriber is already registered
/// - The configured filter does not parse
pub fn init_tracing_subscriber(config: &LogConfig, log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = build_env_filter(config)?;

    let stdout_writer = BoxMakeWriter::new(io::stdout);
    let file_writer = match (config.file_logging, log_dir) {
        (true, Some(dir)) => match build_file_writer(dir) {
            Ok(writer) => Some(writer),
            Err(err) => {
                eprintln!("Failed to initialize file logging, falling back to stdout: {err:#}");
                None
            }
        },
        _ => None,
    };

    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(stdout_writer);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn build_file_writer(log_dir: &Path) -> anyhow::Result<NonBlocking> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log dir: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_directives() {
        let dev = build_filter_directives(true);
        assert!(dev.contains(&"debug".to_string()));
        assert!(dev.contains(&"sc_infra=debug".to_string()));

        let prod = build_filter_directives(false);
        assert!(prod.contains(&"info".to_string()));
        assert!(prod.contains(&"sc_platform=info".to_string()));
    }

    #[test]
    fn test_configured_filter_is_validated() {
        let config = LogConfig {
            filter: Some("info,sc_app=loud".to_string()),
            ..Default::default()
        };
        assert!(build_env_filter(&config).is_err());

        let config = LogConfig {
            filter: Some("warn,sc_infra=trace".to_string()),
            ..Default::default()
        };
        assert!(build_env_filter(&config).is_ok());
    }

    // Only test in this binary that installs the global subscriber.
    #[test]
    fn test_init_with_file_logging() {
        let dir = tempfile::TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");
        let config = LogConfig {
            filter: Some("info".to_string()),
            file_logging: true,
            ..Default::default()
        };

        init_tracing_subscriber(&config, Some(&log_dir)).unwrap();
        tracing::info!("file logging initialized");

        assert!(log_dir.is_dir());
        assert!(LOG_GUARD.get().is_some());
        assert!(init_tracing_subscriber(&LogConfig::default(), None).is_err());
    }
}
