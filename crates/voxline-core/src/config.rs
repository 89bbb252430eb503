//! Account-level configuration shared by every resource
use std::env;

use serde::{Deserialize, Serialize};

use crate::credentials::{CredentialsProvider, ACCOUNT_SID_KEY, AUTH_TOKEN_KEY};
use crate::error::{CoreError, CoreResult};

pub const DEFAULT_HOST: &str = "api.twilio.com";
pub const DEFAULT_API_VERSION: &str = "2010-04-01";

/// Identity, credentials and endpoint of one remote account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Host with optional port, e.g. `api.twilio.com` or `127.0.0.1:8002`
    pub host: String,
    pub api_version: String,
    /// `https` when true, `http` otherwise
    pub secure: bool,
}

impl AccountConfig {
    /// Build a config for the default host and API version.
    /// Spaces in the SID and token are stripped.
    pub fn new(account_sid: impl AsRef<str>, auth_token: impl AsRef<str>) -> Self {
        Self {
            account_sid: strip_spaces(account_sid.as_ref()),
            auth_token: strip_spaces(auth_token.as_ref()),
            host: DEFAULT_HOST.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            secure: true,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> CoreResult<Self> {
        let account_sid = env::var(ACCOUNT_SID_KEY)
            .map_err(|_| CoreError::Missing(ACCOUNT_SID_KEY.to_string()))?;
        let auth_token = env::var(AUTH_TOKEN_KEY)
            .map_err(|_| CoreError::Missing(AUTH_TOKEN_KEY.to_string()))?;

        let host = env::var("VOXLINE_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let api_version =
            env::var("VOXLINE_API_VERSION").unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());
        let secure = env::var("VOXLINE_SECURE")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Ok(Self::new(account_sid, auth_token)
            .with_host(host)
            .with_api_version(api_version)
            .with_secure(secure))
    }

    /// Resolve credentials through a provider, using defaults for the endpoint
    pub fn from_provider(provider: &dyn CredentialsProvider) -> CoreResult<Self> {
        let account_sid = provider
            .get(ACCOUNT_SID_KEY)
            .ok_or_else(|| CoreError::Missing(ACCOUNT_SID_KEY.to_string()))?;
        let auth_token = provider
            .get(AUTH_TOKEN_KEY)
            .ok_or_else(|| CoreError::Missing(AUTH_TOKEN_KEY.to_string()))?;
        Ok(Self::new(account_sid, auth_token))
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.account_sid.is_empty() {
            return Err(CoreError::Invalid("account sid is empty".to_string()));
        }
        if self.host.is_empty() {
            return Err(CoreError::Invalid("host is empty".to_string()));
        }
        Ok(())
    }
}

fn strip_spaces(value: &str) -> String {
    value.replace(' ', "")
}
