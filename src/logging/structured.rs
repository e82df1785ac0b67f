//! Subscriber installation
//!
//! Human-readable events go to stderr. `converge --json` owns stdout, so
//! nothing here writes to it. An optional JSON file layer mirrors the same
//! events for later inspection.

use crate::config::LoggingConfig;
use crate::domain::{Result, TempestError};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_NAME: &str = "tempest-conf.log";

/// Flushes the file writer when dropped. Hold it until the process exits.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `log_level` when set. With
/// `local_enabled`, JSON lines are also appended to `tempest-conf.log`
/// under `local_path`, rotated per `local_rotation`.
///
/// # Errors
///
/// Returns `TempestError::Configuration` for an unknown level name or when
/// the log directory cannot be created.
///
/// ```no_run
/// use tempest_conf::config::LoggingConfig;
/// use tempest_conf::logging::init_logging;
///
/// let _guard = init_logging("debug", &LoggingConfig::default())?;
/// # Ok::<(), tempest_conf::domain::TempestError>(())
/// ```
pub fn init_logging(log_level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = level_from_name(log_level)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tempest_conf={level}")));

    let mut layers = vec![tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter.clone())
        .boxed()];

    let file_guard = if config.local_enabled {
        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            TempestError::Configuration(format!(
                "Cannot create log directory {}: {e}",
                config.local_path
            ))
        })?;

        let appender = RollingFileAppender::new(
            rotation_from_name(&config.local_rotation),
            &config.local_path,
            LOG_FILE_NAME,
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(writer)
                .with_filter(filter)
                .boxed(),
        );
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry().with(layers).init();

    tracing::debug!(
        level = %level,
        file = config.local_enabled,
        path = %config.local_path,
        "Logging ready"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Only level names are accepted, not the numeric forms `Level` also parses.
fn level_from_name(name: &str) -> Result<Level> {
    if name.is_empty() || name.bytes().any(|b| b.is_ascii_digit()) {
        return Err(unknown_level(name));
    }
    name.parse::<Level>().map_err(|_| unknown_level(name))
}

fn unknown_level(name: &str) -> TempestError {
    TempestError::Configuration(format!(
        "Unknown log level '{name}' (expected trace, debug, info, warn or error)"
    ))
}

// The schema rejects anything else before we get here.
fn rotation_from_name(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}
