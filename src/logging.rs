//! tracing-subscriber setup for the binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  /// Human-readable, for a terminal
  Pretty,
  /// One JSON object per line
  Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
  /// `EnvFilter` directive, e.g. `info` or `liftday=debug`
  pub filter: String,
  pub format: LogFormat,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      filter: "info".into(),
      format: LogFormat::Pretty,
    }
  }
}

/// Install the global subscriber. Safe to call more than once: later calls
/// are ignored.
pub fn init(config: &LoggingConfig) {
  let filter = EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new("info"));

  let result = match config.format {
    LogFormat::Pretty => tracing_subscriber::registry()
      .with(filter)
      .with(fmt::layer().with_target(false))
      .try_init(),
    LogFormat::Json => tracing_subscriber::registry()
      .with(filter)
      .with(fmt::layer().json())
      .try_init(),
  };

  if result.is_err() {
    tracing::debug!("Global subscriber already installed");
  }
}
