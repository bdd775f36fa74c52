//! Core configuration loaded from TOML.
//!
//! # Responsibility
//! - Describe storage and logging settings in one place.
//! - Turn settings into connection options and logging initialization.
//!
//! # Invariants
//! - Unknown keys are rejected.
//! - `busy_timeout_ms` bounds every blocking persistence call; it must lie
//!   in `1..=60000`.

use crate::db::{open_db_in_memory, open_db_with_options, DbError, DbOptions};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("busy_timeout_ms must be between 1 and 60000, got {0}")]
    InvalidBusyTimeout(u64),
}

/// Runtime settings for the quiz core.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    /// SQLite database file. `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Deadline for a blocked persistence call before it fails as transient.
    pub busy_timeout_ms: u64,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory. Logging stays off when unset.
    pub log_dir: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.busy_timeout_ms == 0 || self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::InvalidBusyTimeout(self.busy_timeout_ms));
        }
        Ok(())
    }

    pub fn db_options(&self) -> DbOptions {
        DbOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        }
    }

    /// Opens the configured database and applies migrations.
    pub fn open_db(&self) -> Result<Connection, DbError> {
        match &self.db_path {
            Some(path) => open_db_with_options(path, &self.db_options()),
            None => open_db_in_memory(),
        }
    }

    /// Starts file logging when `log_dir` is set; otherwise does nothing.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        match &self.log_dir {
            Some(log_dir) => init_logging(&self.log_level, log_dir),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn empty_document_uses_defaults() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.db_options().busy_timeout, Duration::from_secs(5));
    }

    #[test]
    fn parses_all_keys() {
        let config = CoreConfig::from_toml_str(
            r#"
            db_path = "/var/lib/quizcraft/core.sqlite3"
            busy_timeout_ms = 2500
            log_level = "warn"
            log_dir = "/var/log/quizcraft"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/var/lib/quizcraft/core.sqlite3"))
        );
        assert_eq!(config.db_options().busy_timeout, Duration::from_millis(2500));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir.as_deref(), Some("/var/log/quizcraft"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = CoreConfig::from_toml_str("pool_size = 4").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        for value in [0, 60_001] {
            let err = CoreConfig::from_toml_str(&format!("busy_timeout_ms = {value}")).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidBusyTimeout(v) if v == value));
        }
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("core.toml");
        std::fs::write(&path, "busy_timeout_ms = 750\n").unwrap();

        let config = CoreConfig::load(&path).unwrap();
        assert_eq!(config.busy_timeout_ms, 750);

        let err = CoreConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn missing_db_path_opens_in_memory_database() {
        let conn = CoreConfig::default().open_db().unwrap();
        let version: u32 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, crate::db::migrations::latest_version());
    }
}
