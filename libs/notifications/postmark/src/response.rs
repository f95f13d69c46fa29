//! Interpretation of Postmark HTTP responses.

use crate::error::{PostmarkError, PostmarkResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded body of an accepted message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendResult {
    #[serde(rename = "MessageID", default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub error_code: i64,
    #[serde(default)]
    pub message: Option<String>,
    /// Fields this crate does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorBody {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

impl ApiErrorBody {
    /// Best-effort decode; a non-JSON body becomes the message verbatim.
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            error_code: 0,
            message: body.trim().to_string(),
        })
    }
}

/// Map a status code and body to a [`SendResult`] or a classified error.
pub fn parse_response(status: u16, body: &str) -> PostmarkResult<SendResult> {
    match status {
        200..=299 => parse_success(body),
        401 => Err(PostmarkError::Auth),
        422 => {
            let error = ApiErrorBody::parse(body);
            Err(PostmarkError::Validation(format!(
                "Postmark rejected the message (code {}): {}",
                error.error_code, error.message
            )))
        }
        500 => Err(PostmarkError::Server),
        503 => Err(PostmarkError::Unavailable),
        _ => {
            let error = ApiErrorBody::parse(body);
            Err(PostmarkError::UnknownApi {
                status,
                code: error.error_code,
                message: error.message,
            })
        }
    }
}

fn parse_success(body: &str) -> PostmarkResult<SendResult> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| PostmarkError::Protocol(format!("body is not JSON: {}", e)))?;

    if !value.is_object() {
        return Err(PostmarkError::Protocol(
            "expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| PostmarkError::Protocol(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_decodes_result() {
        let body = r#"{
            "To": "r@x.com",
            "SubmittedAt": "2024-01-01T00:00:00Z",
            "MessageID": "b7bc2f4a-e38e-4336-af7d-e6c392c2f817",
            "ErrorCode": 0,
            "Message": "OK"
        }"#;

        let result = parse_response(200, body).unwrap();
        assert_eq!(result.message_id.as_deref(), Some("b7bc2f4a-e38e-4336-af7d-e6c392c2f817"));
        assert_eq!(result.to.as_deref(), Some("r@x.com"));
        assert_eq!(result.error_code, 0);
        assert!(result.extra.is_empty());
    }

    #[test]
    fn test_success_keeps_unknown_fields() {
        let result = parse_response(200, r#"{"MessageID":"id","Extra":true}"#).unwrap();
        assert_eq!(result.extra.get("Extra"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_non_object_success_is_protocol_error() {
        for body in ["[]", "\"ok\"", "42", "null", "<html>"] {
            assert!(
                matches!(parse_response(200, body), Err(PostmarkError::Protocol(_))),
                "{body} should be a protocol error"
            );
        }
    }

    #[test]
    fn test_mistyped_success_field_is_protocol_error() {
        assert!(matches!(
            parse_response(200, r#"{"MessageID": 12}"#),
            Err(PostmarkError::Protocol(_))
        ));
    }

    #[test]
    fn test_401_is_auth_error() {
        let err = parse_response(401, r#"{"ErrorCode":10,"Message":"No token"}"#).unwrap_err();
        assert!(matches!(err, PostmarkError::Auth));
        assert!(err.to_string().contains("missing or incorrect API key"));
    }

    #[test]
    fn test_422_is_validation_error_with_code_and_message() {
        let err = parse_response(422, r#"{"ErrorCode":10,"Message":"bad"}"#).unwrap_err();
        assert!(matches!(err, PostmarkError::Validation(_)));
        let text = err.to_string();
        assert!(text.contains("10"));
        assert!(text.contains("bad"));
    }

    #[test]
    fn test_500_and_503() {
        assert!(matches!(parse_response(500, "{}"), Err(PostmarkError::Server)));
        assert!(matches!(parse_response(503, ""), Err(PostmarkError::Unavailable)));
    }

    #[test]
    fn test_other_status_is_unknown_api_error() {
        let err = parse_response(429, r#"{"ErrorCode":429,"Message":"slow down"}"#).unwrap_err();
        match err {
            PostmarkError::UnknownApi { status, code, message } => {
                assert_eq!(status, 429);
                assert_eq!(code, 429);
                assert_eq!(message, "slow down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_api_error_with_plain_body() {
        let err = parse_response(502, "Bad Gateway\n").unwrap_err();
        match err {
            PostmarkError::UnknownApi { status, code, message } => {
                assert_eq!(status, 502);
                assert_eq!(code, 0);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
