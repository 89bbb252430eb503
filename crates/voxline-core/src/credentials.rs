//! Credential lookup collaborators.
//!
//! The token generator and `AccountConfig::from_provider` never read process
//! state directly; they ask a [`CredentialsProvider`]. Callers compose
//! providers with [`ChainProvider`] to express precedence.

use std::collections::HashMap;

/// Well-known key for the account identity
pub const ACCOUNT_SID_KEY: &str = "TWILIO_ACCOUNT_SID";
/// Well-known key for the account secret
pub const AUTH_TOKEN_KEY: &str = "TWILIO_AUTH_TOKEN";

/// Source of named configuration values
pub trait CredentialsProvider: Send + Sync {
    /// Look up a value by key. Empty values count as absent.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads process environment variables
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProvider;

impl CredentialsProvider for EnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// Reads `--KEY=value` or `--KEY value` pairs from an argument list
#[derive(Debug, Clone, Default)]
pub struct ArgsProvider {
    values: HashMap<String, String>,
}

impl ArgsProvider {
    /// Parse the current process arguments (program name skipped)
    pub fn from_process() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = HashMap::new();
        let mut iter = args.into_iter().map(Into::into).peekable();

        while let Some(arg) = iter.next() {
            let Some(flag) = arg.strip_prefix("--") else {
                continue;
            };
            if let Some((key, value)) = flag.split_once('=') {
                values.insert(key.to_string(), value.to_string());
            } else if let Some(next) = iter.peek() {
                if !next.starts_with("--") {
                    let value = iter.next().unwrap_or_default();
                    values.insert(flag.to_string(), value);
                }
            }
        }

        Self { values }
    }
}

impl CredentialsProvider for ArgsProvider {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Fixed in-memory values
#[derive(Debug, Clone, Default)]
pub struct MapProvider {
    values: HashMap<String, String>,
}

impl MapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl CredentialsProvider for MapProvider {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Asks each provider in order; the first hit wins
#[derive(Default)]
pub struct ChainProvider {
    providers: Vec<Box<dyn CredentialsProvider>>,
}

impl ChainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment first, then process arguments
    pub fn standard() -> Self {
        Self::new()
            .push(EnvProvider)
            .push(ArgsProvider::from_process())
    }

    pub fn push<P: CredentialsProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }
}

impl CredentialsProvider for ChainProvider {
    fn get(&self, key: &str) -> Option<String> {
        self.providers.iter().find_map(|p| p.get(key))
    }
}

impl std::fmt::Debug for ChainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainProvider")
            .field("providers", &self.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_provider_parses_both_forms() {
        let provider = ArgsProvider::from_args([
            "--TWILIO_ACCOUNT_SID=AC123",
            "--TWILIO_AUTH_TOKEN",
            "secret",
            "positional",
            "--flag",
        ]);

        assert_eq!(provider.get(ACCOUNT_SID_KEY), Some("AC123".to_string()));
        assert_eq!(provider.get(AUTH_TOKEN_KEY), Some("secret".to_string()));
        assert_eq!(provider.get("flag"), None);
    }

    #[test]
    fn test_args_provider_flag_followed_by_flag_has_no_value() {
        let provider = ArgsProvider::from_args(["--A", "--B=2"]);
        assert_eq!(provider.get("A"), None);
        assert_eq!(provider.get("B"), Some("2".to_string()));
    }

    #[test]
    fn test_chain_first_hit_wins() {
        let chain = ChainProvider::new()
            .push(MapProvider::new().with("A", "first"))
            .push(MapProvider::new().with("A", "second").with("B", "only"));

        assert_eq!(chain.get("A"), Some("first".to_string()));
        assert_eq!(chain.get("B"), Some("only".to_string()));
        assert_eq!(chain.get("C"), None);
    }

    #[test]
    fn test_empty_values_are_absent() {
        let chain = ChainProvider::new()
            .push(MapProvider::new().with("A", ""))
            .push(MapProvider::new().with("A", "fallback"));

        assert_eq!(chain.get("A"), Some("fallback".to_string()));
    }
}
