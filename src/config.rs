//! Environment-driven configuration
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file by the binary (`dotenvy`).

use std::env;
use std::str::FromStr;

use crate::logging::{LogFormat, LoggingConfig};
use crate::progression::ProgressionRules;
use crate::schedule::SetSchedule;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DATABASE_URL_VAR: &str = "LIFTDAY_DATABASE_URL";
pub const REST_SECONDS_VAR: &str = "LIFTDAY_REST_SECONDS";
pub const LOG_VAR: &str = "LIFTDAY_LOG";
pub const LOG_FORMAT_VAR: &str = "LIFTDAY_LOG_FORMAT";

const DEFAULT_DATABASE_URL: &str = "sqlite://liftday.db?mode=rwc";

/// Rest between sets, in seconds
pub const REST_DURATION_SECS: u32 = 90;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value:?}")]
  Invalid { key: String, value: String },
}

/// ---------------------------------------------------------------------------
/// App Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub database_url: String,
  pub rest_seconds: u32,
  pub sets: SetSchedule,
  pub rules: ProgressionRules,
  pub logging: LoggingConfig,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_url: DEFAULT_DATABASE_URL.to_string(),
      rest_seconds: REST_DURATION_SECS,
      sets: SetSchedule::default(),
      rules: ProgressionRules::default(),
      logging: LoggingConfig::default(),
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let rest_seconds = parse_var(REST_SECONDS_VAR)?.unwrap_or(defaults.rest_seconds);
    if rest_seconds == 0 {
      return Err(ConfigError::Invalid {
        key: REST_SECONDS_VAR.into(),
        value: "0".into(),
      });
    }

    let format = match env::var(LOG_FORMAT_VAR).ok().as_deref() {
      None | Some("pretty") => LogFormat::Pretty,
      Some("json") => LogFormat::Json,
      Some(other) => {
        return Err(ConfigError::Invalid {
          key: LOG_FORMAT_VAR.into(),
          value: other.into(),
        })
      }
    };

    Ok(Self {
      database_url: env::var(DATABASE_URL_VAR).unwrap_or(defaults.database_url),
      rest_seconds,
      logging: LoggingConfig {
        filter: env::var(LOG_VAR).unwrap_or(defaults.logging.filter),
        format,
      },
      ..defaults
    })
  }
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
  match env::var(key) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map(Some)
      .map_err(|_| ConfigError::Invalid {
        key: key.into(),
        value: raw,
      }),
    Err(_) => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_defaults_when_unset() {
    temp_env::with_vars_unset(
      [DATABASE_URL_VAR, REST_SECONDS_VAR, LOG_VAR, LOG_FORMAT_VAR],
      || {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.rest_seconds, 90);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
      },
    );
  }

  #[test]
  #[serial]
  fn test_reads_overrides() {
    temp_env::with_vars(
      [
        (DATABASE_URL_VAR, Some("sqlite::memory:")),
        (REST_SECONDS_VAR, Some(" 60 ")),
        (LOG_VAR, Some("liftday=debug")),
        (LOG_FORMAT_VAR, Some("json")),
      ],
      || {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.rest_seconds, 60);
        assert_eq!(config.logging.filter, "liftday=debug");
        assert_eq!(config.logging.format, LogFormat::Json);
      },
    );
  }

  #[test]
  #[serial]
  fn test_rejects_bad_rest_seconds() {
    temp_env::with_var(REST_SECONDS_VAR, Some("ninety"), || {
      let err = AppConfig::from_env().unwrap_err();
      assert_eq!(
        err,
        ConfigError::Invalid {
          key: REST_SECONDS_VAR.into(),
          value: "ninety".into()
        }
      );
    });
    temp_env::with_var(REST_SECONDS_VAR, Some("0"), || {
      assert!(AppConfig::from_env().is_err());
    });
  }

  #[test]
  #[serial]
  fn test_rejects_unknown_log_format() {
    temp_env::with_vars(
      [(REST_SECONDS_VAR, None), (LOG_FORMAT_VAR, Some("xml"))],
      || {
        assert!(AppConfig::from_env().is_err());
      },
    );
  }
}
