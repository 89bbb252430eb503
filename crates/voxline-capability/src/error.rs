use thiserror::Error;

pub type CapabilityResult<T> = Result<T, CapabilityError>;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error(
        "Capability requires an Account SID and Auth Token set explicitly \
         or via the TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN environment variables"
    )]
    MissingCredentials,

    #[error("unknown grant kind: {0}")]
    UnknownGrant(String),

    #[error("grant '{0}' requires an argument")]
    MissingArgument(&'static str),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}
