//! REST bindings for the telephony provider's account resources.
//!
//! Every resource is a [`Resource`]: a [`ResourceConfig`] (account, path,
//! allowed verbs, optional instance id) plus a shared HTTP client. Verb
//! methods issue exactly one request and return an [`ApiResponse`] whose data
//! is normalised (camel-cased aliases, parsed dates) and whose
//! [`ErrorInfo`] is set for transport failures and non-2xx statuses.
//!
//! ```no_run
//! # async fn demo() -> voxline_rest::RestResult<()> {
//! use voxline_core::AccountConfig;
//! use voxline_rest::{params, RestClient};
//!
//! let client = RestClient::new(AccountConfig::new("AC123", "secret"))?;
//! let response = client
//!     .calls()
//!     .post(Some(&params([("to", "+15551230000"), ("from", "+15559870000")])))
//!     .await?;
//! if let Some(error) = &response.error {
//!     eprintln!("call failed: {}", error.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod normalize;
pub mod params;
pub mod resource;
pub mod resources;
pub mod response;
pub mod uri;

pub use client::{RestClient, RestClientBuilder};
pub use error::{RestError, RestResult};
pub use normalize::Normalized;
pub use params::{params, Params};
pub use resource::{Resource, ResourceConfig};
pub use resources::{Calls, Conferences, Notifications, Recordings, Transcriptions};
pub use response::{ApiResponse, ErrorInfo, ErrorStatus, RawResponse, TransportFailure};

/// `User-Agent` sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
