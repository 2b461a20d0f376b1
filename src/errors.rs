use thiserror::Error;

use lodge_config::ConfigError;
use lodge_core::CoreError;

/// Failures surfaced by [`crate::Lodge`].
#[derive(Debug, Error)]
pub enum LodgeError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl LodgeError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LodgeError::Core(err) if err.is_validation())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LodgeError::Core(err) if err.is_not_found())
    }
}
