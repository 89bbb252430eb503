//! Scope strings: `scope:<service>:<privilege>[?<url-encoded-params>]`.
//!
//! The platform's token verifier parses these verbatim.

use std::fmt;

use indexmap::IndexMap;

/// Ordered parameters attached to a scope
pub type ScopeParams = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeUri {
    pub service: String,
    pub privilege: String,
    pub params: ScopeParams,
}

impl ScopeUri {
    pub fn new(service: impl Into<String>, privilege: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            privilege: privilege.into(),
            params: ScopeParams::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for ScopeUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope:{}:{}", self.service, self.privilege)?;
        if !self.params.is_empty() {
            write!(f, "?{}", query_string(&self.params))?;
        }
        Ok(())
    }
}

/// Marks the token verifier accepts unescaped, on top of RFC 3986's
/// unreserved set
const KEPT_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// `k1=v1&k2=v2` with keys and values percent-encoded
pub fn query_string(params: &ScopeParams) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// `urlencoding` output with the marks restored. A literal `%` is always
/// encoded as `%25`, so the replacements cannot touch caller text.
fn escape(value: &str) -> String {
    KEPT_MARKS
        .iter()
        .fold(urlencoding::encode(value).into_owned(), |acc, (encoded, mark)| {
            acc.replace(encoded, mark)
        })
}
