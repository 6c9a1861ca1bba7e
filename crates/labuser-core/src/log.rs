//! Logging system for labuser.
//!
//! Everything is written to stderr so stdout stays reserved for command
//! output. A copy can additionally go to a log file.

use labuser_types::config::{LogConfig, LogFormat};
use labuser_types::{LabUserError, LogLevel, Result};
use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type Base = Layered<EnvFilter, Registry>;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(format!("{}={}", crate::APP_NAME, level.as_directive()))
}

/// Initialize logging.
///
/// `level_override` comes from command-line verbosity flags and wins over the
/// configured level; `RUST_LOG` wins over both. The returned guard must be
/// held until exit when a log file is configured, otherwise buffered lines
/// are lost.
pub fn init(config: &LogConfig, level_override: Option<LogLevel>) -> Result<Option<WorkerGuard>> {
    let level = level_override.unwrap_or(config.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let console: Box<dyn Layer<Base> + Send + Sync> = match config.format {
        LogFormat::Pretty => fmt::layer().pretty().with_writer(io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(io::stderr)
            .boxed(),
    };

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                LabUserError::Config(format!("Log file path has no file name: {}", path.display()))
            })?;

            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| LabUserError::Other(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}
