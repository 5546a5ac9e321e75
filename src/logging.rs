use exn::ResultExt;
use shelf_config::{LogConfig, LogFormat};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{ErrorKind, Result};

/// Filter directive for the configured level, raised by each `-v`.
pub fn directive(config: &LogConfig, verbosity: u8) -> String {
    match verbosity {
        0 => config.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber, writing to stderr so replies on stdout stay
/// clean. `RUST_LOG` wins over both the configuration and `-v`.
pub fn init(config: &LogConfig, verbosity: u8) -> Result<()> {
    let filter = match std::env::var_os(EnvFilter::DEFAULT_ENV) {
        Some(_) => EnvFilter::try_from_default_env().or_raise(|| ErrorKind::Logging)?,
        None => EnvFilter::try_new(directive(config, verbosity)).or_raise(|| ErrorKind::Logging)?,
    };
    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Compact => registry.with(fmt::layer().compact().with_writer(std::io::stderr)).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr)).try_init(),
    }
    .or_raise(|| ErrorKind::Logging)
}
