//! Concrete account resources.
//!
//! Each wrapper fixes the resource path and verbs of a
//! [`Resource`](crate::Resource) and adds accessors for its sub-resources.
//! Wrappers deref to the resource base, so the verb
//! methods (`get`, `list`, `post`, ...) are available directly.

use voxline_core::{HttpMethod, MethodSet};

/// Only GET
pub(crate) fn read_only() -> MethodSet {
    MethodSet::of(&[HttpMethod::Get])
}

macro_rules! resource_wrapper {
    ($(#[$meta:meta])* $name:ident, $path:expr, [$($method:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            inner: $crate::resource::Resource,
        }

        impl $name {
            pub const PATH: &'static str = $path;

            pub fn allowed_methods() -> voxline_core::MethodSet {
                voxline_core::MethodSet::of(&[$(voxline_core::HttpMethod::$method),+])
            }

            pub fn new(account: voxline_core::AccountConfig, http: reqwest::Client) -> Self {
                let config = $crate::resource::ResourceConfig::builtin(
                    account,
                    Self::PATH,
                    Self::allowed_methods(),
                );
                Self {
                    inner: $crate::resource::Resource::new(config, http),
                }
            }

            pub fn into_inner(self) -> $crate::resource::Resource {
                self.inner
            }
        }

        impl std::ops::Deref for $name {
            type Target = $crate::resource::Resource;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    };
}

pub mod calls;
pub mod conferences;
pub mod recordings;

pub use calls::Calls;
pub use conferences::Conferences;
pub use recordings::Recordings;

resource_wrapper!(
    /// Account-wide debugger notifications
    Notifications,
    "Notifications",
    [Get, Delete]
);

resource_wrapper!(
    /// Transcriptions of recordings across the account
    Transcriptions,
    "Transcriptions",
    [Get]
);
