use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("unknown scale '{0}' and no maximum score supplied")]
    UnknownScale(String),

    #[error("non-finite raw score {value} for scale '{scale}'")]
    NonFiniteScore { scale: String, value: f64 },
}
