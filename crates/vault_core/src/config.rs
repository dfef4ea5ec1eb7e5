//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve store, backup, export and logging locations.
//! - Apply defaults for unset or blank variables.
//!
//! # Invariants
//! - `log_dir` is always absolute (logging rejects relative paths).

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "VAULT_DB_PATH";
pub const ENV_BACKUP_DIR: &str = "VAULT_BACKUP_DIR";
pub const ENV_EXPORT_PATH: &str = "VAULT_EXPORT_PATH";
pub const ENV_LOG_LEVEL: &str = "VAULT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "VAULT_LOG_DIR";

const DEFAULT_DB_PATH: &str = "vault.sqlite3";
const DEFAULT_BACKUP_DIR: &str = "backups";
const DEFAULT_EXPORT_PATH: &str = "export.txt";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    /// Current directory is needed to absolutize a relative path.
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
        }
    }
}

/// Resolved vault settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub db_path: PathBuf,
    pub backup_dir: PathBuf,
    pub export_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl VaultConfig {
    /// Reads settings from `VAULT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_dir = PathBuf::from(read(ENV_LOG_DIR).unwrap_or_else(|| DEFAULT_LOG_DIR.into()));
        let log_dir = if log_dir.is_absolute() {
            log_dir
        } else {
            std::env::current_dir()
                .map_err(ConfigError::CurrentDir)?
                .join(log_dir)
        };

        Ok(Self {
            db_path: read(ENV_DB_PATH)
                .unwrap_or_else(|| DEFAULT_DB_PATH.into())
                .into(),
            backup_dir: read(ENV_BACKUP_DIR)
                .unwrap_or_else(|| DEFAULT_BACKUP_DIR.into())
                .into(),
            export_path: read(ENV_EXPORT_PATH)
                .unwrap_or_else(|| DEFAULT_EXPORT_PATH.into())
                .into(),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        })
    }
}
