//! HTTP verbs a remote resource may accept, and the set type used to gate them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The four verbs the REST API understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }

    fn bit(&self) -> u8 {
        match self {
            HttpMethod::Get => 0b0001,
            HttpMethod::Put => 0b0010,
            HttpMethod::Post => 0b0100,
            HttpMethod::Delete => 0b1000,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = CoreError;

    /// Case-insensitive: `get`, `Get` and `GET` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "PUT" => Ok(HttpMethod::Put),
            "POST" => Ok(HttpMethod::Post),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(CoreError::Invalid(format!("unsupported HTTP method: {other}"))),
        }
    }
}

/// Set of allowed verbs for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodSet(u8);

impl MethodSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(0b1111)
    }

    pub fn of(methods: &[HttpMethod]) -> Self {
        methods.iter().fold(Self::empty(), |set, m| set.with(*m))
    }

    pub fn with(self, method: HttpMethod) -> Self {
        Self(self.0 | method.bit())
    }

    pub fn contains(&self, method: HttpMethod) -> bool {
        self.0 & method.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = HttpMethod> + '_ {
        HttpMethod::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<HttpMethod> for MethodSet {
    fn from_iter<I: IntoIterator<Item = HttpMethod>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, m| set.with(m))
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|m| m.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
