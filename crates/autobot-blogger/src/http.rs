//! Status and error-body handling shared by the Google clients.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::warn;

use autobot_core::Error;

#[derive(Deserialize)]
struct GoogleErrorBody {
    error: Option<GoogleErrorField>,
}

/// Token endpoint errors are a bare code (`"invalid_grant"`); API errors are
/// an object with a message.
#[derive(Deserialize)]
#[serde(untagged)]
enum GoogleErrorField {
    Code(String),
    Detailed { message: Option<String> },
}

/// Best-effort error text from a Google error body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let parsed: GoogleErrorBody = serde_json::from_str(body).ok()?;
    match parsed.error? {
        GoogleErrorField::Code(code) => Some(code),
        GoogleErrorField::Detailed { message } => message,
    }
}

/// Map a non-success Blogger API response to the error taxonomy.
///
/// 401/403 mean the credential was rejected, 404 a missing blog or post;
/// everything else is reported as the upstream being unavailable.
pub(crate) fn status_error(status: StatusCode, body: &str, context: &str) -> Error {
    let detail = error_message(body).unwrap_or_else(|| status.to_string());

    warn!(
        subsystem = "blogger",
        http_status = status.as_u16(),
        context,
        detail = %detail,
        "Google API request failed"
    );

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::NotAuthenticated(format!("{}: {}", context, detail))
        }
        StatusCode::NOT_FOUND => Error::NotFound(format!("{}: {}", context, detail)),
        _ => Error::UpstreamUnavailable(format!(
            "{} (status {}): {}",
            context,
            status.as_u16(),
            detail
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_token_endpoint() {
        let body = r#"{"error": "invalid_grant", "error_description": "Bad Request"}"#;
        assert_eq!(error_message(body).as_deref(), Some("invalid_grant"));
    }

    #[test]
    fn test_error_message_api() {
        let body = r#"{"error": {"code": 404, "message": "Blog not found"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Blog not found"));
        assert_eq!(error_message("not json"), None);
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "", "list blogs"),
            Error::NotAuthenticated(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "", "list blogs"),
            Error::NotAuthenticated(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "", "get post"),
            Error::NotFound(_)
        ));
        let err = status_error(StatusCode::BAD_GATEWAY, "", "get post");
        assert!(err.is_upstream());
        assert!(err.to_string().contains("502"));
    }
}
