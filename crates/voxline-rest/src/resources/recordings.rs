use super::read_only;
use crate::resource::Resource;

resource_wrapper!(
    /// Call recordings stored for the account
    Recordings,
    "Recordings",
    [Get, Delete]
);

impl Recordings {
    /// Transcriptions of one recording (GET only)
    pub fn transcriptions(&self, recording_sid: &str) -> Resource {
        self.builtin_child(recording_sid, "Transcriptions", read_only())
    }
}
