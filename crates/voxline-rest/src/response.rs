//! Result of one request: normalised data, error details and the raw exchange.

use std::collections::HashMap;
use std::fmt;

use serde_json::{json, Value};

use crate::normalize::Normalized;

/// Statuses treated as success, inclusive
pub const SUCCESS_RANGE: std::ops::RangeInclusive<u16> = 200..=206;

/// What came back from the remote API for a single call
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status, absent when no response was received
    pub status_code: Option<u16>,
    /// Normalised body; a synthesized `{status: 500, message}` body when the
    /// transport failed or the body was empty or not JSON
    pub data: Normalized,
    /// Set on transport failure or a status outside 200..=206
    pub error: Option<ErrorInfo>,
    pub raw: Option<RawResponse>,
    pub elapsed_ms: u64,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The unprocessed HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub status: ErrorStatus,
    pub message: String,
    /// Provider error code from the body, e.g. `20404`
    pub code: Option<i64>,
    /// Documentation link from the body's `more_info`
    pub more_info: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    /// Response received with a non-success status
    Http(u16),
    /// No response received
    Transport(TransportFailure),
}

impl ErrorStatus {
    pub fn http(&self) -> Option<u16> {
        match self {
            ErrorStatus::Http(status) => Some(*status),
            ErrorStatus::Transport(_) => None,
        }
    }
}

/// Coarse classification of a failed exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Connect,
    Timeout,
    Request,
    Other,
}

impl TransportFailure {
    pub fn classify(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportFailure::Timeout
        } else if err.is_connect() {
            TransportFailure::Connect
        } else if err.is_request() || err.is_builder() || err.is_redirect() {
            TransportFailure::Request
        } else {
            TransportFailure::Other
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            TransportFailure::Connect => "ECONNREFUSED",
            TransportFailure::Timeout => "ETIMEDOUT",
            TransportFailure::Request => "EREQUEST",
            TransportFailure::Other => "ETRANSPORT",
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How the exchange ended, before any shaping
#[derive(Debug)]
pub(crate) enum Exchange {
    Received(RawResponse),
    Failed {
        failure: TransportFailure,
        cause: String,
    },
}

/// Decode, classify and normalise one exchange
pub(crate) fn shape(exchange: Exchange, host: &str, elapsed_ms: u64) -> ApiResponse {
    match exchange {
        Exchange::Received(raw) => {
            let data = decode_body(&raw.body);
            let error = if SUCCESS_RANGE.contains(&raw.status) {
                None
            } else {
                Some(error_from_body(raw.status, &data))
            };

            ApiResponse {
                status_code: Some(raw.status),
                data: Normalized::from_json(data),
                error,
                raw: Some(raw),
                elapsed_ms,
            }
        }
        Exchange::Failed { failure, cause } => {
            tracing::warn!(host = %host, code = %failure, cause = %cause, "Transport failure");
            ApiResponse {
                status_code: None,
                data: Normalized::from_json(local_error_body(&cause)),
                error: Some(ErrorInfo {
                    status: ErrorStatus::Transport(failure),
                    message: format!("Unable to reach host: \"{}\"", host),
                    code: None,
                    more_info: None,
                }),
                raw: None,
                elapsed_ms,
            }
        }
    }
}

fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return local_error_body("Empty body");
    }
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "Response body is not valid JSON");
            local_error_body(&e.to_string())
        }
    }
}

fn local_error_body(message: &str) -> Value {
    json!({ "status": 500, "message": message })
}

fn error_from_body(status: u16, data: &Value) -> ErrorInfo {
    ErrorInfo {
        status: ErrorStatus::Http(status),
        message: data
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unable to complete HTTP request")
            .to_string(),
        code: data.get("code").and_then(Value::as_i64),
        more_info: data
            .get("more_info")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn received(status: u16, body: &str) -> Exchange {
        Exchange::Received(RawResponse {
            status,
            headers: HashMap::new(),
            body: body.to_string(),
        })
    }

    #[test]
    fn test_success_statuses_have_no_error() {
        for status in 200..=206 {
            let response = shape(received(status, r#"{"sid":"CA1"}"#), "h", 0);
            assert!(response.error.is_none(), "status {status}");
            assert_eq!(response.data["sid"].as_str(), Some("CA1"));
        }
    }

    #[test]
    fn test_other_statuses_carry_status() {
        for status in [100, 199, 207, 301, 400, 404, 500, 503] {
            let response = shape(received(status, "{}"), "h", 0);
            let error = response.error.expect("error expected");
            assert_eq!(error.status, ErrorStatus::Http(status));
            assert_eq!(error.status.http(), Some(status));
        }
    }

    #[test]
    fn test_error_fields_from_body() {
        let body = r#"{"status":404,"message":"The requested resource was not found","code":20404,"more_info":"https://www.twilio.com/docs/errors/20404"}"#;
        let response = shape(received(404, body), "h", 0);
        let error = response.error.unwrap();

        assert_eq!(error.message, "The requested resource was not found");
        assert_eq!(error.code, Some(20404));
        assert_eq!(
            error.more_info.as_deref(),
            Some("https://www.twilio.com/docs/errors/20404")
        );
        // Data is still delivered, with aliases
        assert_eq!(response.data["moreInfo"].as_str(), error.more_info.as_deref());
    }

    #[test]
    fn test_error_without_message_uses_generic_text() {
        let response = shape(received(502, r#"{"detail":"x"}"#), "h", 0);
        assert_eq!(
            response.error.unwrap().message,
            "Unable to complete HTTP request"
        );
    }

    #[test]
    fn test_empty_body_synthesizes_500() {
        let response = shape(received(204, ""), "h", 0);
        assert!(response.error.is_none());
        assert_eq!(response.data["status"].as_i64(), Some(500));
        assert_eq!(response.data["message"].as_str(), Some("Empty body"));
    }

    #[test]
    fn test_invalid_json_synthesizes_500_and_keeps_error_message() {
        let response = shape(received(500, "<html>oops</html>"), "h", 0);
        assert_eq!(response.data["status"].as_i64(), Some(500));
        let error = response.error.unwrap();
        assert_eq!(error.status, ErrorStatus::Http(500));
        assert_eq!(Some(error.message.as_str()), response.data["message"].as_str());
        assert_eq!(response.raw.unwrap().body, "<html>oops</html>");
    }

    #[test]
    fn test_transport_failure() {
        let response = shape(
            Exchange::Failed {
                failure: TransportFailure::Connect,
                cause: "connection refused".to_string(),
            },
            "api.example.com",
            3,
        );

        assert_eq!(response.status_code, None);
        assert!(response.raw.is_none());
        assert_eq!(response.data["message"].as_str(), Some("connection refused"));
        let error = response.error.unwrap();
        assert_eq!(error.status, ErrorStatus::Transport(TransportFailure::Connect));
        assert_eq!(error.status.http(), None);
        assert_eq!(error.message, "Unable to reach host: \"api.example.com\"");
    }
}
