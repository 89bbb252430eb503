//! URI construction for account resources.
//!
//! Layout: `scheme://host/apiVersion/Accounts/{accountSid}/{resourcePath}[/{instanceId}]`.
//! The segment order is fixed by the remote API. Caller supplied values
//! (account SID, instance ids) are percent-encoded into a single segment.

use url::Url;
use voxline_core::AccountConfig;

use crate::error::{RestError, RestResult};

pub struct ResourceUri;

impl ResourceUri {
    /// `scheme://host/apiVersion`
    pub fn base(account: &AccountConfig) -> RestResult<Url> {
        let raw = format!(
            "{}://{}/{}",
            account.scheme(),
            account.host,
            account.api_version.trim_matches('/')
        );
        Self::parse(&raw)
    }

    /// Canonical URI for a resource collection, or one instance of it
    pub fn build(
        account: &AccountConfig,
        resource_path: &str,
        instance_id: Option<&str>,
    ) -> RestResult<Url> {
        account.validate()?;
        let path = resource_path.trim_matches('/');
        for segment in path.split('/') {
            Self::check_path_segment(segment, resource_path)?;
        }

        let mut raw = format!(
            "{}://{}/{}/Accounts/{}/{}",
            account.scheme(),
            account.host,
            account.api_version.trim_matches('/'),
            urlencoding::encode(&account.account_sid),
            path
        );
        if let Some(id) = instance_id.filter(|id| !id.is_empty()) {
            if is_dot_segment(id) {
                return Err(RestError::InvalidConfig(format!(
                    "Invalid instance id '{}'",
                    id
                )));
            }
            raw.push('/');
            raw.push_str(&urlencoding::encode(id));
        }
        Self::parse(&raw)
    }

    /// Resource paths are joined verbatim, so every segment must stay a
    /// plain path segment
    fn check_path_segment(segment: &str, resource_path: &str) -> RestResult<()> {
        if segment.is_empty() || is_dot_segment(segment) || segment.contains(['?', '#']) {
            return Err(RestError::InvalidConfig(format!(
                "Invalid resource path '{}'",
                resource_path
            )));
        }
        Ok(())
    }

    fn parse(raw: &str) -> RestResult<Url> {
        Url::parse(raw)
            .map_err(|e| RestError::InvalidConfig(format!("Invalid resource URI '{}': {}", raw, e)))
    }
}

/// `.` and `..`, including their percent-encoded spellings, which URL
/// parsing collapses
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}
