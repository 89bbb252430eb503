use super::read_only;
use crate::resource::Resource;

resource_wrapper!(
    /// Calls placed or received by the account
    Calls,
    "Calls",
    [Get, Post]
);

impl Calls {
    /// Recordings made during one call (GET only)
    pub fn recordings(&self, call_sid: &str) -> Resource {
        self.builtin_child(call_sid, "Recordings", read_only())
    }

    /// Notifications raised during one call (GET only)
    pub fn notifications(&self, call_sid: &str) -> Resource {
        self.builtin_child(call_sid, "Notifications", read_only())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxline_core::{AccountConfig, HttpMethod};

    fn calls() -> Calls {
        Calls::new(AccountConfig::new("AC1", "t"), reqwest::Client::new())
    }

    #[test]
    fn test_calls_verbs() {
        let calls = calls();
        assert!(calls.accepts(HttpMethod::Get));
        assert!(calls.accepts(HttpMethod::Post));
        assert!(!calls.accepts(HttpMethod::Delete));
        assert!(!calls.accepts(HttpMethod::Put));
    }

    #[test]
    fn test_sub_resources() {
        let calls = calls();
        let recordings = calls.recordings("CA9");
        let notifications = calls.notifications("CA9");

        assert_eq!(recordings.config().resource_path, "Calls/CA9/Recordings");
        assert_eq!(recordings.config().allowed_methods, read_only());
        assert_eq!(notifications.config().resource_path, "Calls/CA9/Notifications");
        assert_eq!(
            notifications.uri().unwrap().as_str(),
            "https://api.twilio.com/2010-04-01/Accounts/AC1/Calls/CA9/Notifications"
        );
        // Parent untouched
        assert_eq!(calls.config().resource_path, "Calls");
        assert_eq!(calls.config().allowed_methods, Calls::allowed_methods());
    }
}
