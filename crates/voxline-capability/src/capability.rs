//! Token generator

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use voxline_core::{ChainProvider, CredentialsProvider, ACCOUNT_SID_KEY, AUTH_TOKEN_KEY};

use crate::error::{CapabilityError, CapabilityResult};
use crate::grant::Grant;
use crate::scope::{query_string, ScopeParams, ScopeUri};

/// Token lifetime used by [`Capability::generate`]
pub const DEFAULT_TTL_SECS: u64 = 3600;

const EVENTS_PATH: &str = "/2010-04-01/Events";

/// JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// All scope strings, space separated
    pub scope: String,
    /// Account SID
    pub iss: String,
    /// Unix seconds
    pub exp: i64,
}

/// Outgoing grant, resolved into a scope only when a token is generated so
/// that a client name granted later is still attached
#[derive(Debug, Clone, PartialEq, Eq)]
struct OutgoingScope {
    application_sid: String,
    app_params: Option<String>,
}

/// Accumulates grants for one account and signs them into tokens.
///
/// Grants are added with `&mut self` during setup; `generate` only reads, so
/// a finished capability can be shared and used from many threads.
#[derive(Debug, Clone)]
pub struct Capability {
    account_sid: String,
    auth_token: String,
    scopes: Vec<String>,
    client_name: Option<String>,
    outgoing: Option<OutgoingScope>,
}

impl Capability {
    /// Explicit credentials; spaces are stripped
    pub fn new(account_sid: &str, auth_token: &str) -> CapabilityResult<Self> {
        if account_sid.is_empty() || auth_token.is_empty() {
            return Err(CapabilityError::MissingCredentials);
        }
        Ok(Self {
            account_sid: account_sid.replace(' ', ""),
            auth_token: auth_token.replace(' ', ""),
            scopes: Vec::new(),
            client_name: None,
            outgoing: None,
        })
    }

    /// Explicit values win; missing ones are looked up in `provider`
    pub fn resolve(
        account_sid: Option<&str>,
        auth_token: Option<&str>,
        provider: &dyn CredentialsProvider,
    ) -> CapabilityResult<Self> {
        let sid = account_sid
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| provider.get(ACCOUNT_SID_KEY));
        let token = auth_token
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or_else(|| provider.get(AUTH_TOKEN_KEY));

        match (sid, token) {
            (Some(sid), Some(token)) => Self::new(&sid, &token),
            _ => Err(CapabilityError::MissingCredentials),
        }
    }

    /// Credentials from the environment, then from process arguments
    pub fn from_default_sources() -> CapabilityResult<Self> {
        Self::resolve(None, None, &ChainProvider::standard())
    }

    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    pub fn allow(&mut self, grant: Grant) -> &mut Self {
        match grant {
            Grant::Incoming { client_name } => {
                let scope = ScopeUri::new("client", "incoming").param("clientName", &client_name);
                self.scopes.push(scope.to_string());
                self.client_name = Some(client_name);
            }
            Grant::Outgoing {
                application_sid,
                params,
            } => {
                self.outgoing = Some(OutgoingScope {
                    application_sid,
                    app_params: params.filter(|p| !p.is_empty()).map(|p| query_string(&p)),
                });
            }
            Grant::Events { filters } => {
                let mut scope = ScopeUri::new("stream", "subscribe").param("path", EVENTS_PATH);
                if let Some(filters) = filters.filter(|f| !f.is_empty()) {
                    scope = scope.param("params", query_string(&filters));
                }
                self.scopes.push(scope.to_string());
            }
        }
        self
    }

    /// Grant by kind name (`incoming`, `outgoing`, `events`)
    pub fn allow_named(
        &mut self,
        kind: &str,
        arg: Option<&str>,
        params: Option<ScopeParams>,
    ) -> CapabilityResult<&mut Self> {
        let grant = Grant::from_kind(kind, arg, params)?;
        Ok(self.allow(grant))
    }

    pub fn allow_client_incoming(&mut self, client_name: &str) -> &mut Self {
        self.allow(Grant::incoming(client_name))
    }

    pub fn allow_client_outgoing(
        &mut self,
        application_sid: &str,
        params: Option<ScopeParams>,
    ) -> &mut Self {
        self.allow(Grant::Outgoing {
            application_sid: application_sid.to_string(),
            params,
        })
    }

    pub fn allow_event_stream(&mut self, filters: Option<ScopeParams>) -> &mut Self {
        self.allow(Grant::events(filters))
    }

    /// Scope strings as they would be signed right now
    pub fn scopes(&self) -> Vec<String> {
        let mut scopes = self.scopes.clone();

        if let Some(outgoing) = &self.outgoing {
            let mut scope =
                ScopeUri::new("client", "outgoing").param("appSid", &outgoing.application_sid);
            if let Some(app_params) = &outgoing.app_params {
                scope = scope.param("appParams", app_params);
            }
            if let Some(client_name) = &self.client_name {
                scope = scope.param("clientName", client_name);
            }
            scopes.push(scope.to_string());
        }

        scopes
    }

    /// Expiry saturates at the largest representable timestamp
    pub fn claims(&self, ttl_secs: u64) -> TokenClaims {
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        TokenClaims {
            scope: self.scopes().join(" "),
            iss: self.account_sid.clone(),
            exp: Utc::now().timestamp().saturating_add(ttl),
        }
    }

    /// Signed token valid for one hour
    pub fn generate(&self) -> CapabilityResult<String> {
        self.generate_with_ttl(DEFAULT_TTL_SECS)
    }

    pub fn generate_with_ttl(&self, ttl_secs: u64) -> CapabilityResult<String> {
        let claims = self.claims(ttl_secs);
        let key = EncodingKey::from_secret(self.auth_token.as_bytes());
        let token = encode(&Header::new(Algorithm::HS256), &claims, &key)?;

        tracing::debug!(
            issuer = %claims.iss,
            scopes = self.scopes.len() + usize::from(self.outgoing.is_some()),
            ttl_secs,
            "capability token generated"
        );

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxline_core::MapProvider;

    #[test]
    fn test_missing_credentials() {
        assert!(matches!(
            Capability::new("", "token"),
            Err(CapabilityError::MissingCredentials)
        ));
        assert!(matches!(
            Capability::new("AC1", ""),
            Err(CapabilityError::MissingCredentials)
        ));
    }

    #[test]
    fn test_spaces_stripped() {
        let capability = Capability::new(" AC 1 ", "to ken").unwrap();
        assert_eq!(capability.account_sid(), "AC1");
        assert_eq!(capability.claims(10).iss, "AC1");
    }

    #[test]
    fn test_resolve_precedence() {
        let provider = MapProvider::new()
            .with(ACCOUNT_SID_KEY, "ACprovider")
            .with(AUTH_TOKEN_KEY, "providertoken");

        let explicit = Capability::resolve(Some("ACexplicit"), None, &provider).unwrap();
        assert_eq!(explicit.account_sid(), "ACexplicit");

        let fallback = Capability::resolve(Some(""), None, &provider).unwrap();
        assert_eq!(fallback.account_sid(), "ACprovider");

        let empty = MapProvider::new().with(ACCOUNT_SID_KEY, "AC1");
        assert!(matches!(
            Capability::resolve(None, None, &empty),
            Err(CapabilityError::MissingCredentials)
        ));
    }

    #[test]
    fn test_incoming_scope() {
        let mut capability = Capability::new("AC1", "t").unwrap();
        capability.allow_client_incoming("bob");
        assert_eq!(
            capability.scopes(),
            vec!["scope:client:incoming?clientName=bob".to_string()]
        );
    }

    #[test]
    fn test_outgoing_resolved_lazily() {
        let mut capability = Capability::new("AC1", "t").unwrap();
        let mut params = ScopeParams::new();
        params.insert("foo".to_string(), "bar".to_string());

        capability.allow(Grant::outgoing_with_params("AP123", params));
        assert_eq!(
            capability.scopes(),
            vec!["scope:client:outgoing?appSid=AP123&appParams=foo%3Dbar".to_string()]
        );

        capability.allow(Grant::incoming("bob"));
        assert_eq!(
            capability.scopes(),
            vec![
                "scope:client:incoming?clientName=bob".to_string(),
                "scope:client:outgoing?appSid=AP123&appParams=foo%3Dbar&clientName=bob"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_event_stream_scope() {
        let mut capability = Capability::new("AC1", "t").unwrap();
        capability.allow_event_stream(None);

        let mut filters = ScopeParams::new();
        filters.insert("callSid".to_string(), "CA1".to_string());
        capability.allow_event_stream(Some(filters));

        assert_eq!(
            capability.scopes(),
            vec![
                "scope:stream:subscribe?path=%2F2010-04-01%2FEvents".to_string(),
                "scope:stream:subscribe?path=%2F2010-04-01%2FEvents&params=callSid%3DCA1"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_allow_named() {
        let mut capability = Capability::new("AC1", "t").unwrap();
        capability
            .allow_named("events", None, None)
            .unwrap()
            .allow_named("incoming", Some("alice"), None)
            .unwrap();

        assert!(matches!(
            capability.allow_named("voicemail", Some("x"), None),
            Err(CapabilityError::UnknownGrant(_))
        ));
        assert_eq!(
            capability.scopes(),
            vec![
                "scope:stream:subscribe?path=%2F2010-04-01%2FEvents".to_string(),
                "scope:client:incoming?clientName=alice".to_string(),
            ]
        );
    }

    #[test]
    fn test_scopes_snapshot_does_not_mutate() {
        let mut capability = Capability::new("AC1", "t").unwrap();
        capability.allow_client_outgoing("AP1", None).allow_client_incoming("bob");

        let first = capability.claims(60);
        let second = capability.claims(3600);
        assert_eq!(first.scope, second.scope);
        assert_eq!(capability.scopes().len(), 2);
        assert_eq!(capability.scopes.len(), 1);
    }

    #[test]
    fn test_large_ttl_saturates() {
        let capability = Capability::new("AC1", "t").unwrap();
        let now = Utc::now().timestamp();

        assert_eq!(capability.claims(u64::MAX).exp, i64::MAX);
        assert_eq!(capability.claims(i64::MAX as u64).exp, i64::MAX);
        assert!(capability.claims(u64::MAX / 2 + 1).exp > now);
        assert!(capability.generate_with_ttl(u64::MAX).is_ok());
    }
}
