//! Entry point holding the account and the shared HTTP client

use std::time::Duration;

use reqwest::Client;
use voxline_core::{AccountConfig, MethodSet};

use crate::error::RestResult;
use crate::resource::{Resource, ResourceConfig};
use crate::resources::{Calls, Conferences, Notifications, Recordings, Transcriptions};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Root of the resource tree for one account
#[derive(Debug, Clone)]
pub struct RestClient {
    account: AccountConfig,
    http: Client,
}

impl RestClient {
    /// Client with default timeouts
    pub fn new(account: AccountConfig) -> RestResult<Self> {
        Self::builder(account).build()
    }

    pub fn builder(account: AccountConfig) -> RestClientBuilder {
        RestClientBuilder {
            account,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn account(&self) -> &AccountConfig {
        &self.account
    }

    pub fn calls(&self) -> Calls {
        Calls::new(self.account.clone(), self.http.clone())
    }

    pub fn recordings(&self) -> Recordings {
        Recordings::new(self.account.clone(), self.http.clone())
    }

    pub fn notifications(&self) -> Notifications {
        Notifications::new(self.account.clone(), self.http.clone())
    }

    pub fn conferences(&self) -> Conferences {
        Conferences::new(self.account.clone(), self.http.clone())
    }

    pub fn transcriptions(&self) -> Transcriptions {
        Transcriptions::new(self.account.clone(), self.http.clone())
    }

    /// Any other account resource by path; at least one verb must be allowed
    pub fn resource(
        &self,
        resource_path: &str,
        allowed_methods: MethodSet,
    ) -> RestResult<Resource> {
        let config = ResourceConfig::new(self.account.clone(), resource_path, allowed_methods)?;
        Ok(Resource::new(config, self.http.clone()))
    }
}

pub struct RestClientBuilder {
    account: AccountConfig,
    timeout: Duration,
    connect_timeout: Duration,
}

impl RestClientBuilder {
    /// Total time allowed for one request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn build(self) -> RestResult<RestClient> {
        self.account.validate()?;

        let http = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;

        tracing::debug!(
            host = %self.account.host,
            api_version = %self.account.api_version,
            secure = %self.account.secure,
            "REST client ready"
        );

        Ok(RestClient {
            account: self.account,
            http,
        })
    }
}
