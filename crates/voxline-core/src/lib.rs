//! Shared building blocks for the voxline crates: account configuration,
//! HTTP method sets, credential providers and logging setup.

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod method;

// Re-export commonly used types
pub use config::AccountConfig;
pub use credentials::{
    ArgsProvider, ChainProvider, CredentialsProvider, EnvProvider, MapProvider, ACCOUNT_SID_KEY,
    AUTH_TOKEN_KEY,
};
pub use error::{CoreError, CoreResult};
pub use method::{HttpMethod, MethodSet};
