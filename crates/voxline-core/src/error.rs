use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid: {0}")]
    Invalid(String),
    #[error("missing configuration: {0}")]
    Missing(String),
    #[error("logging: {0}")]
    Logging(String),
}
