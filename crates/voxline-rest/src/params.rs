//! Request parameter handling.
//!
//! The remote API expects `PascalCase` parameter names (`To`, `From`,
//! `StatusCallback`), so every caller-supplied key is capitalized before it is
//! sent as a query string or form body.

use indexmap::IndexMap;

/// Caller-supplied request parameters, in insertion order
pub type Params = IndexMap<String, String>;

/// Build [`Params`] from any iterator of key/value pairs
pub fn params<I, K, V>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Uppercase the first character of every whitespace-delimited token
pub fn capitalize(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_token_start = true;

    for c in key.chars() {
        if at_token_start && !c.is_whitespace() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_token_start = c.is_whitespace();
    }

    out
}

/// Wire form of the parameters: one pair per input key, keys capitalized,
/// values untouched. Colliding keys (`to` and `To`) are both kept.
pub fn to_wire(params: &Params) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(k, v)| (capitalize(k), v.clone()))
        .collect()
}
