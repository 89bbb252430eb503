use voxline_core::{CoreError, HttpMethod, MethodSet};

/// Failures raised before any request leaves the process.
///
/// Remote failures (transport, HTTP status, undecodable body) are not errors
/// at this level; they are reported through `ApiResponse::error`.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    #[error("method {method} not allowed on '{resource}' (allowed: {allowed})")]
    MethodNotAllowed {
        method: HttpMethod,
        resource: String,
        allowed: MethodSet,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type RestResult<T> = Result<T, RestError>;
