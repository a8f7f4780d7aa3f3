use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid dosage: {0:?} contains no numeric amount")]
    InvalidDosage(String),
}
