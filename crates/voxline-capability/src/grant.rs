//! Typed permission grants

use std::fmt;
use std::str::FromStr;

use crate::error::CapabilityError;
use crate::scope::ScopeParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantKind {
    Incoming,
    Outgoing,
    Events,
}

impl GrantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantKind::Incoming => "incoming",
            GrantKind::Outgoing => "outgoing",
            GrantKind::Events => "events",
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantKind {
    type Err = CapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incoming" => Ok(GrantKind::Incoming),
            "outgoing" => Ok(GrantKind::Outgoing),
            "events" => Ok(GrantKind::Events),
            other => Err(CapabilityError::UnknownGrant(other.to_string())),
        }
    }
}

/// One permission to embed in a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Accept incoming connections addressed to this client name
    Incoming { client_name: String },
    /// Place outgoing calls through an application, with optional parameters
    /// forwarded to it
    Outgoing {
        application_sid: String,
        params: Option<ScopeParams>,
    },
    /// Subscribe to the account's event stream, optionally filtered
    Events { filters: Option<ScopeParams> },
}

impl Grant {
    pub fn incoming(client_name: impl Into<String>) -> Self {
        Grant::Incoming {
            client_name: client_name.into(),
        }
    }

    pub fn outgoing(application_sid: impl Into<String>) -> Self {
        Grant::Outgoing {
            application_sid: application_sid.into(),
            params: None,
        }
    }

    pub fn outgoing_with_params(application_sid: impl Into<String>, params: ScopeParams) -> Self {
        Grant::Outgoing {
            application_sid: application_sid.into(),
            params: Some(params),
        }
    }

    pub fn events(filters: Option<ScopeParams>) -> Self {
        Grant::Events { filters }
    }

    /// Build a grant from its kind name.
    ///
    /// `arg` is the client name for `incoming` and the application SID for
    /// `outgoing`; `params` are the application parameters or event filters.
    pub fn from_kind(
        kind: &str,
        arg: Option<&str>,
        params: Option<ScopeParams>,
    ) -> Result<Self, CapabilityError> {
        let kind: GrantKind = kind.parse()?;
        match kind {
            GrantKind::Incoming => arg
                .map(Grant::incoming)
                .ok_or(CapabilityError::MissingArgument(GrantKind::Incoming.as_str())),
            GrantKind::Outgoing => arg
                .map(|sid| Grant::Outgoing {
                    application_sid: sid.to_string(),
                    params,
                })
                .ok_or(CapabilityError::MissingArgument(GrantKind::Outgoing.as_str())),
            GrantKind::Events => Ok(Grant::events(params)),
        }
    }

    pub fn kind(&self) -> GrantKind {
        match self {
            Grant::Incoming { .. } => GrantKind::Incoming,
            Grant::Outgoing { .. } => GrantKind::Outgoing,
            Grant::Events { .. } => GrantKind::Events,
        }
    }
}
