//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the session
//! and store. Environment variables are read by the binaries, never by core logic, so
//! tests can build a `CoreConfig` directly.

use crate::constants::{
    DEFAULT_CONSULT_DELAY_MS, DEFAULT_DATA_DIR, DEFAULT_PROFILE_DELAY_MS, DEFAULT_REPLY_DELAY_MS,
};
use crate::{CoreResult, TriageError};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    reply_delay: Duration,
    profile_delay: Duration,
    consult_delay: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::InvalidInput` if `data_dir` is empty.
    pub fn new(
        data_dir: PathBuf,
        reply_delay: Duration,
        profile_delay: Duration,
        consult_delay: Duration,
    ) -> CoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(TriageError::InvalidInput("data_dir cannot be empty".into()));
        }

        Ok(Self {
            data_dir,
            reply_delay,
            profile_delay,
            consult_delay,
        })
    }

    /// Configuration with the default pauses and the given store directory.
    pub fn with_data_dir(data_dir: PathBuf) -> CoreResult<Self> {
        Self::new(
            data_dir,
            Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
            Duration::from_millis(DEFAULT_PROFILE_DELAY_MS),
            Duration::from_millis(DEFAULT_CONSULT_DELAY_MS),
        )
    }

    /// Same directory, all pauses zeroed. Used by scripted front ends and tests.
    pub fn without_delays(mut self) -> Self {
        self.reply_delay = Duration::ZERO;
        self.profile_delay = Duration::ZERO;
        self.consult_delay = Duration::ZERO;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    pub fn profile_delay(&self) -> Duration {
        self.profile_delay
    }

    pub fn consult_delay(&self) -> Duration {
        self.consult_delay
    }
}

/// Resolve the store directory from an optional override value.
///
/// Empty or whitespace-only values fall back to [`DEFAULT_DATA_DIR`].
pub fn data_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Parse a millisecond delay from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `default_ms`.
///
/// # Errors
///
/// Returns `TriageError::InvalidInput` naming `name` if the value is not a non-negative
/// integer.
pub fn delay_from_env_value(
    name: &str,
    value: Option<String>,
    default_ms: u64,
) -> CoreResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let millis = match value {
        Some(v) => v.parse::<u64>().map_err(|_| {
            TriageError::InvalidInput(format!(
                "{} must be a whole number of milliseconds, got '{}'",
                name, v
            ))
        })?,
        None => default_ms,
    };

    Ok(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_data_dir() {
        let err = CoreConfig::with_data_dir(PathBuf::new()).expect_err("empty dir should fail");
        assert!(matches!(err, TriageError::InvalidInput(_)));
    }

    #[test]
    fn with_data_dir_uses_default_delays() {
        let cfg = CoreConfig::with_data_dir(PathBuf::from("store")).unwrap();
        assert_eq!(cfg.reply_delay(), Duration::from_millis(1_200));
        assert_eq!(cfg.profile_delay(), Duration::from_millis(1_000));
        assert_eq!(cfg.consult_delay(), Duration::from_millis(2_000));
    }

    #[test]
    fn without_delays_keeps_data_dir() {
        let cfg = CoreConfig::with_data_dir(PathBuf::from("store"))
            .unwrap()
            .without_delays();
        assert_eq!(cfg.data_dir(), Path::new("store"));
        assert_eq!(cfg.reply_delay(), Duration::ZERO);
        assert_eq!(cfg.consult_delay(), Duration::ZERO);
    }

    #[test]
    fn data_dir_falls_back_to_default() {
        assert_eq!(data_dir_from_env_value(None), PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(
            data_dir_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert_eq!(
            data_dir_from_env_value(Some(" /tmp/triage ".into())),
            PathBuf::from("/tmp/triage")
        );
    }

    #[test]
    fn delay_parses_or_defaults() {
        assert_eq!(
            delay_from_env_value("X", None, 1_200).unwrap(),
            Duration::from_millis(1_200)
        );
        assert_eq!(
            delay_from_env_value("X", Some("0".into()), 1_200).unwrap(),
            Duration::ZERO
        );
    }

    #[test]
    fn delay_rejects_non_numeric() {
        let err = delay_from_env_value("TRIAGE_REPLY_DELAY_MS", Some("soon".into()), 1_200)
            .expect_err("non-numeric delay should fail");
        match err {
            TriageError::InvalidInput(msg) => assert!(msg.contains("TRIAGE_REPLY_DELAY_MS")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
