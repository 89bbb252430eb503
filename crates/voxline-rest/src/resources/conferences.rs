use voxline_core::{HttpMethod, MethodSet};

use crate::resource::Resource;

resource_wrapper!(
    /// Conference rooms of the account
    Conferences,
    "Conferences",
    [Get]
);

impl Conferences {
    /// Participants of one conference; they can be listed, added and kicked
    pub fn participants(&self, conference_sid: &str) -> Resource {
        self.builtin_child(
            conference_sid,
            "Participants",
            MethodSet::of(&[HttpMethod::Get, HttpMethod::Post, HttpMethod::Delete]),
        )
    }
}
