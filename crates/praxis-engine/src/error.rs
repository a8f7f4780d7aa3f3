use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid optimization parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
}
