//! Resource base: one remote resource, its allowed verbs, and the request path.

use std::collections::HashMap;

use reqwest::header::{ACCEPT, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, Method, Request, Response};
use url::Url;
use voxline_core::logging::{log_request_end, log_request_start};
use voxline_core::{AccountConfig, HttpMethod, MethodSet};

use crate::error::{RestError, RestResult};
use crate::params::{to_wire, Params};
use crate::response::{shape, ApiResponse, Exchange, RawResponse, TransportFailure};
use crate::uri::ResourceUri;
use crate::USER_AGENT;

/// Where a resource lives and what it accepts.
///
/// Values are never mutated once handed to a [`Resource`]; derivations copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceConfig {
    pub account: AccountConfig,
    /// Path below `Accounts/{sid}`, e.g. `Calls` or `Calls/CA1/Recordings`
    pub resource_path: String,
    pub allowed_methods: MethodSet,
    pub instance_id: Option<String>,
}

impl ResourceConfig {
    /// Fails when `allowed_methods` is empty
    pub fn new(
        account: AccountConfig,
        resource_path: impl Into<String>,
        allowed_methods: MethodSet,
    ) -> RestResult<Self> {
        let resource_path = resource_path.into();
        ensure_methods(&resource_path, allowed_methods)?;
        Ok(Self::builtin(account, resource_path, allowed_methods))
    }

    /// Resources with a fixed, non-empty verb set
    pub(crate) fn builtin(
        account: AccountConfig,
        resource_path: impl Into<String>,
        allowed_methods: MethodSet,
    ) -> Self {
        debug_assert!(!allowed_methods.is_empty());
        Self {
            account,
            resource_path: resource_path.into(),
            allowed_methods,
            instance_id: None,
        }
    }

    /// Config for a sub-resource of one instance:
    /// `{resource_path}/{instance_id}/{child}` with its own verbs
    pub fn child(
        &self,
        instance_id: &str,
        child: &str,
        allowed_methods: MethodSet,
    ) -> RestResult<Self> {
        let config = self.builtin_child(instance_id, child, allowed_methods);
        ensure_methods(&config.resource_path, allowed_methods)?;
        Ok(config)
    }

    /// The instance id is percent-encoded so it stays one path segment
    pub(crate) fn builtin_child(
        &self,
        instance_id: &str,
        child: &str,
        allowed_methods: MethodSet,
    ) -> Self {
        let resource_path = format!(
            "{}/{}/{}",
            self.resource_path.trim_end_matches('/'),
            urlencoding::encode(instance_id),
            child
        );
        Self::builtin(self.account.clone(), resource_path, allowed_methods)
    }

    /// Same resource, addressing a single instance
    pub fn with_instance(&self, instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: Some(instance_id.into()),
            ..self.clone()
        }
    }

    pub fn uri(&self) -> RestResult<Url> {
        ResourceUri::build(
            &self.account,
            &self.resource_path,
            self.instance_id.as_deref(),
        )
    }
}

/// A remote resource bound to an HTTP client
#[derive(Debug, Clone)]
pub struct Resource {
    config: ResourceConfig,
    http: Client,
}

impl Resource {
    pub fn new(config: ResourceConfig, http: Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn uri(&self) -> RestResult<Url> {
        self.config.uri()
    }

    pub fn accepts(&self, method: HttpMethod) -> bool {
        self.config.allowed_methods.contains(method)
    }

    /// Address one instance of this resource, e.g. `Calls/CA42`
    pub fn instance(&self, instance_id: impl Into<String>) -> Resource {
        Resource::new(self.config.with_instance(instance_id), self.http.clone())
    }

    /// Derive a sub-resource of one instance
    pub fn child(
        &self,
        instance_id: &str,
        child: &str,
        allowed_methods: MethodSet,
    ) -> RestResult<Resource> {
        let config = self.config.child(instance_id, child, allowed_methods)?;
        Ok(Resource::new(config, self.http.clone()))
    }

    pub(crate) fn builtin_child(
        &self,
        instance_id: &str,
        child: &str,
        allowed_methods: MethodSet,
    ) -> Resource {
        Resource::new(
            self.config.builtin_child(instance_id, child, allowed_methods),
            self.http.clone(),
        )
    }

    /// GET with `params` as query string
    pub async fn get(&self, params: Option<&Params>) -> RestResult<ApiResponse> {
        self.request(HttpMethod::Get, params).await
    }

    /// Alias of [`Resource::get`]
    pub async fn list(&self, params: Option<&Params>) -> RestResult<ApiResponse> {
        self.get(params).await
    }

    pub async fn put(&self, params: Option<&Params>) -> RestResult<ApiResponse> {
        self.request(HttpMethod::Put, params).await
    }

    /// Alias of [`Resource::put`]
    pub async fn update(&self, params: Option<&Params>) -> RestResult<ApiResponse> {
        self.put(params).await
    }

    pub async fn post(&self, params: Option<&Params>) -> RestResult<ApiResponse> {
        self.request(HttpMethod::Post, params).await
    }

    pub async fn delete(&self, params: Option<&Params>) -> RestResult<ApiResponse> {
        self.request(HttpMethod::Delete, params).await
    }

    /// Issue exactly one request.
    ///
    /// Returns `Err` only when nothing was sent (disallowed verb, bad URI).
    /// Remote failures come back as `Ok` with [`ApiResponse::error`] set.
    pub async fn request(
        &self,
        method: HttpMethod,
        params: Option<&Params>,
    ) -> RestResult<ApiResponse> {
        let request = self.build_request(method, params)?;
        let url = request.url().to_string();
        let start = log_request_start(method.as_str(), &url);

        let exchange = match self.http.execute(request).await {
            Ok(response) => Exchange::Received(read_response(response).await),
            Err(e) => Exchange::Failed {
                failure: TransportFailure::classify(&e),
                cause: e.to_string(),
            },
        };

        if let Exchange::Received(raw) = &exchange {
            log_request_end(method.as_str(), &url, raw.status, start);
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        Ok(shape(exchange, &self.config.account.host, elapsed_ms))
    }

    /// Build the request envelope: URI, capitalized params (query for GET,
    /// form body otherwise), basic auth and fixed headers.
    pub fn build_request(&self, method: HttpMethod, params: Option<&Params>) -> RestResult<Request> {
        self.ensure_allowed(method)?;

        let url = self.uri()?;
        let wire = params.map(to_wire).unwrap_or_default();
        let account = &self.config.account;

        let mut builder = self
            .http
            .request(to_reqwest_method(method), url)
            .basic_auth(&account.account_sid, Some(&account.auth_token))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT_HEADER, USER_AGENT);

        builder = match method {
            HttpMethod::Get => builder.query(&wire),
            _ => builder.form(&wire),
        };

        Ok(builder.build()?)
    }

    fn ensure_allowed(&self, method: HttpMethod) -> RestResult<()> {
        if self.accepts(method) {
            return Ok(());
        }
        tracing::debug!(
            http_method = %method,
            resource = %self.config.resource_path,
            "method not allowed"
        );
        Err(RestError::MethodNotAllowed {
            method,
            resource: self.config.resource_path.clone(),
            allowed: self.config.allowed_methods,
        })
    }
}

fn ensure_methods(resource_path: &str, allowed_methods: MethodSet) -> RestResult<()> {
    if allowed_methods.is_empty() {
        return Err(RestError::InvalidConfig(format!(
            "Resource '{}' allows no methods",
            resource_path
        )));
    }
    Ok(())
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Post => Method::POST,
        HttpMethod::Delete => Method::DELETE,
    }
}

async fn read_response(response: Response) -> RawResponse {
    let status = response.status().as_u16();

    let mut headers = HashMap::new();
    for (name, value) in response.headers() {
        if let Ok(value_str) = value.to_str() {
            headers.insert(name.to_string(), value_str.to_string());
        }
    }

    let body = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(http_status = %status, error = %e, "Failed to read response body");
            String::new()
        }
    };

    RawResponse {
        status,
        headers,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calls() -> Resource {
        let account = AccountConfig::new("AC123", "secret");
        let config = ResourceConfig::new(
            account,
            "Calls",
            MethodSet::of(&[HttpMethod::Get, HttpMethod::Post]),
        )
        .unwrap();
        Resource::new(config, Client::new())
    }

    #[test]
    fn test_child_derivation_copies() {
        let parent = calls();
        let before = parent.config().clone();
        let child = parent
            .child("CA1", "Recordings", MethodSet::of(&[HttpMethod::Get]))
            .unwrap();

        assert_eq!(parent.config(), &before);
        assert!(child.config().resource_path.starts_with(&before.resource_path));
        assert_eq!(child.config().resource_path, "Calls/CA1/Recordings");
        assert!(!child.config().allowed_methods.contains(HttpMethod::Post));

        let again = parent
            .child("CA1", "Recordings", MethodSet::of(&[HttpMethod::Get]))
            .unwrap();
        assert_eq!(again.config(), child.config());
    }

    #[test]
    fn test_instance_uri() {
        let call = calls().instance("CA42");
        assert_eq!(
            call.uri().unwrap().as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Calls/CA42"
        );
        assert_eq!(calls().config().instance_id, None);
    }

    #[test]
    fn test_get_request_uses_query_string() {
        let request = calls()
            .build_request(
                HttpMethod::Get,
                Some(&crate::params([("status", "completed"), ("pageSize", "5")])),
            )
            .unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().query(), Some("Status=completed&PageSize=5"));
        assert!(request.body().is_none());
        assert_eq!(request.headers()[ACCEPT], "application/json");
        assert_eq!(request.headers()[USER_AGENT_HEADER], USER_AGENT);
        assert!(request.headers()[reqwest::header::AUTHORIZATION]
            .to_str()
            .unwrap()
            .starts_with("Basic "));
    }

    #[test]
    fn test_post_request_uses_form_body() {
        let request = calls()
            .build_request(
                HttpMethod::Post,
                Some(&crate::params([("to", "+15551230000"), ("url", "http://x/y")])),
            )
            .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().query(), None);
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(
            std::str::from_utf8(body).unwrap(),
            "To=%2B15551230000&Url=http%3A%2F%2Fx%2Fy"
        );
        assert_eq!(
            request.headers()[reqwest::header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_disallowed_method_builds_nothing() {
        let err = calls().build_request(HttpMethod::Delete, None).unwrap_err();
        assert!(matches!(
            err,
            RestError::MethodNotAllowed { method: HttpMethod::Delete, ref resource, .. } if resource == "Calls"
        ));
    }

    #[test]
    fn test_empty_method_set_rejected() {
        let account = AccountConfig::new("AC123", "secret");
        assert!(matches!(
            ResourceConfig::new(account, "Queues", MethodSet::empty()),
            Err(RestError::InvalidConfig(_))
        ));
        assert!(matches!(
            calls().child("CA1", "Recordings", MethodSet::empty()),
            Err(RestError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_child_id_stays_one_segment() {
        let recordings = calls()
            .child("CA1?Foo=bar", "Recordings", MethodSet::of(&[HttpMethod::Get]))
            .unwrap();
        let url = recordings.uri().unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Calls/CA1%3FFoo%3Dbar/Recordings"
        );
        assert_eq!(url.query(), None);

        let escaped = calls()
            .child("../../AC999", "Recordings", MethodSet::of(&[HttpMethod::Get]))
            .unwrap();
        assert!(escaped
            .uri()
            .unwrap()
            .path()
            .starts_with("/2010-04-01/Accounts/AC123/Calls/"));

        let dotted = calls()
            .child("..", "Recordings", MethodSet::of(&[HttpMethod::Get]))
            .unwrap();
        assert!(matches!(dotted.uri(), Err(RestError::InvalidConfig(_))));
        assert!(matches!(
            dotted.build_request(HttpMethod::Get, None),
            Err(RestError::InvalidConfig(_))
        ));
    }
}
