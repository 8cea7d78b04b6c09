use pocketshop_storage::StorageError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The store could not be opened or a read/write failed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
