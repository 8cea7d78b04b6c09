//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `POCKETSHOP_DATA_DIR` - directory holding the database and the current-user entry (default: `.pocketshop`)
//! - `POCKETSHOP_TOAST_DISPLAY_MS` - how long a notification stays visible (default: 3000)
//! - `POCKETSHOP_TOAST_EXIT_MS` - exit transition before removal (default: 300)
//! - `POCKETSHOP_SYNC_STEP_DELAY_MS` - artificial pause per initialization step (default: 0).
//!   The pause is a blocking `std::thread::sleep`; inside an async task, run
//!   `Shop::initialize` via `spawn_blocking` or leave this at 0.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DATABASE_FILE: &str = "pocketshop.db";

const DEFAULT_DATA_DIR: &str = ".pocketshop";
const DEFAULT_TOAST_DISPLAY_MS: u64 = 3000;
const DEFAULT_TOAST_EXIT_MS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    pub data_dir: PathBuf,
    pub toast_display: Duration,
    pub toast_exit: Duration,
    pub sync_step_delay: Duration,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            toast_display: Duration::from_millis(DEFAULT_TOAST_DISPLAY_MS),
            toast_exit: Duration::from_millis(DEFAULT_TOAST_EXIT_MS),
            sync_step_delay: Duration::ZERO,
        }
    }
}

impl ShopConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("POCKETSHOP_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        Ok(Self {
            data_dir,
            toast_display: millis(&lookup, "POCKETSHOP_TOAST_DISPLAY_MS", DEFAULT_TOAST_DISPLAY_MS)?,
            toast_exit: millis(&lookup, "POCKETSHOP_TOAST_EXIT_MS", DEFAULT_TOAST_EXIT_MS)?,
            sync_step_delay: millis(&lookup, "POCKETSHOP_SYNC_STEP_DELAY_MS", 0)?,
        })
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn millis<F>(lookup: &F, key: &str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(Duration::from_millis(default)),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}
