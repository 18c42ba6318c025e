//! Structured logging for causeway.
//!
//! Console output goes through `tracing-subscriber`'s fmt layer with an uptime
//! timer. When enabled, a JSON copy of every event is written to
//! `causeway.log` for later inspection of data-quality warnings.

use causeway_config::Config;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the JSON log file written into the log directory.
pub const LOG_FILE_NAME: &str = "causeway.log";

const DEFAULT_FILTER: &str = "info";

/// The config's log level, or [`DEFAULT_FILTER`] when it is unset. `RUST_LOG`
/// overrides both in [`init_logging`].
fn filter_string(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.is_empty() => config.debug.log_level.clone(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file
/// * `to_file` - whether to write the JSON log file at all
/// * `config` - supplies the log level when `RUST_LOG` is unset
///
/// # Examples
///
/// ```no_run
/// use causeway_log::init_logging;
/// use causeway_config::Config;
///
/// let config = Config::default();
/// init_logging(None, false, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, to_file: bool, config: Option<&Config>) {
    let filter_str = filter_string(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));
    let effective = env_filter.to_string();

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if to_file
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::info!(
            filter = %effective,
            file = %log_dir.join(LOG_FILE_NAME).display(),
            "logging initialised"
        );
        return;
    }

    subscriber.init();
    tracing::info!(filter = %effective, "logging initialised");
}

/// The filter used when neither `RUST_LOG` nor the config says otherwise.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
