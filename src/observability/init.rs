//! Subscriber installation.

use super::file_writer::RotatingLog;
use crate::infrastructure::paths::resolve_data_path;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.trace_level`, otherwise `"info"`. Events go to stderr, or to a
/// size-rotating file when `config.log_file` is set.
///
/// Returns `false` if a global subscriber was already installed; the existing
/// one is left in place.
///
/// ```
/// use iftaar_finder::{observability::init_tracing, Config};
///
/// let config = Config { trace_level: Some("debug".to_string()), ..Config::default() };
/// init_tracing(&config);
/// assert!(!init_tracing(&config));
/// ```
pub fn init_tracing(config: &Config) -> bool {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let installed = match &config.log_file {
        Some(log_file) => {
            let path = resolve_data_path(log_file);
            if let Some(parent) = path.parent() {
                if std::fs::create_dir_all(parent).is_err() {
                    return false;
                }
            }
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(RotatingLog::new(path)))
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(level, log_file = ?config.log_file, "tracing initialized");
    }
    installed.is_ok()
}
