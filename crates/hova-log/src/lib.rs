//! Structured logging for the hova simulation.
//!
//! Console output with uptime timestamps and module targets, filterable through
//! `RUST_LOG` or the config's `debug.log_level`. Debug builds can also write a
//! JSON log file for looking at a run after the fact.

use hova_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written inside the log directory.
pub const LOG_FILE_NAME: &str = "hova.log";

/// Pick the filter directive string for a config.
///
/// An empty `debug.log_level` means "use the default".
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over the config. When `debug_build` is set and a `log_dir`
/// is given, a JSON file layer is added next to the console layer. Failing to
/// create the file is not fatal; console logging still comes up and says why.
///
/// # Examples
///
/// ```no_run
/// use hova_log::init_logging;
/// use hova_config::Config;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let log_file = match log_dir {
        Some(log_dir) if debug_build => Some(open_log_file(log_dir)),
        _ => None,
    };

    match log_file {
        Some(Ok(file)) => {
            let file_layer = fmt::layer()
                .with_writer(file)
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::uptime())
                .json();
            subscriber.with(file_layer).init();
        }
        Some(Err(e)) => {
            subscriber.init();
            tracing::warn!("File logging disabled: {e}");
        }
        None => subscriber.init(),
    }
}

/// Create `log_dir` if needed and open a fresh [`LOG_FILE_NAME`] inside it.
pub fn open_log_file(log_dir: &Path) -> std::io::Result<std::fs::File> {
    std::fs::create_dir_all(log_dir)?;
    std::fs::File::create(log_dir.join(LOG_FILE_NAME))
}

/// An `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
