//! Capability tokens for client-side voice sessions.
//!
//! A [`Capability`] accumulates scope grants (incoming client, outgoing
//! application, event stream) and signs them, with an issuer and expiry, into
//! an HS256 JWT keyed by the account's auth token.
//!
//! ```
//! use voxline_capability::{Capability, Grant};
//!
//! let mut capability = Capability::new("AC123", "secret").unwrap();
//! capability
//!     .allow(Grant::outgoing("AP456"))
//!     .allow(Grant::incoming("bob"));
//! let token = capability.generate().unwrap();
//! assert_eq!(token.split('.').count(), 3);
//! ```

pub mod capability;
pub mod error;
pub mod grant;
pub mod scope;

pub use capability::{Capability, TokenClaims, DEFAULT_TTL_SECS};
pub use error::{CapabilityError, CapabilityResult};
pub use grant::{Grant, GrantKind};
pub use scope::{ScopeParams, ScopeUri};
