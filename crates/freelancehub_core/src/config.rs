//! Runtime configuration for core callers.
//!
//! Values come from `FREELANCEHUB_*` environment variables, falling back to
//! defaults. Invalid values are errors rather than silently ignored.

use crate::analytics::earnings::BucketingMode;
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "FREELANCEHUB_DB_PATH";
pub const LOG_DIR_VAR: &str = "FREELANCEHUB_LOG_DIR";
pub const LOG_LEVEL_VAR: &str = "FREELANCEHUB_LOG_LEVEL";
pub const BUCKETING_VAR: &str = "FREELANCEHUB_BUCKETING";

const DEFAULT_DB_FILE_NAME: &str = "freelancehub.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        variable: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                variable,
                value,
                expected,
            } => write!(f, "invalid {variable} `{value}`; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
    pub log_level: &'static str,
    pub bucketing: BucketingMode,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_dir: None,
            log_level: default_log_level(),
            bucketing: BucketingMode::default(),
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(DB_PATH_VAR) {
            config.db_path = PathBuf::from(path.trim());
        }

        if let Some(dir) = get(LOG_DIR_VAR) {
            let dir = PathBuf::from(dir.trim());
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    variable: LOG_DIR_VAR,
                    value: dir.display().to_string(),
                    expected: "an absolute path",
                });
            }
            config.log_dir = Some(dir);
        }

        if let Some(level) = get(LOG_LEVEL_VAR) {
            config.log_level =
                normalize_level(&level).map_err(|_| ConfigError::InvalidValue {
                    variable: LOG_LEVEL_VAR,
                    value: level.clone(),
                    expected: "trace|debug|info|warn|error",
                })?;
        }

        if let Some(mode) = get(BUCKETING_VAR) {
            config.bucketing =
                BucketingMode::parse(&mode).ok_or_else(|| ConfigError::InvalidValue {
                    variable: BUCKETING_VAR,
                    value: mode.clone(),
                    expected: "month_of_year|strict",
                })?;
        }

        Ok(config)
    }
}
