//! Logging setup.
//!
//! Console output goes to stderr so that command output on stdout stays
//! clean. An optional log file receives the same events without ANSI
//! colours. The level defaults to INFO and follows `RUST_LOG` when set.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the global subscriber.
///
/// With a `log_dir`, the directory is created, `log_file` inside it is
/// truncated and every event is also written there.
pub fn init_logging(log_dir: Option<&Path>, log_file: &str) -> Result<LoggingGuard, io::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    let (file_layer, file_guard) = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            fs::write(dir.join(log_file), "")?;
            let appender = tracing_appender::rolling::never(dir, log_file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Default log file name.
pub fn default_log_file() -> &'static str {
    "windatlas.log"
}
