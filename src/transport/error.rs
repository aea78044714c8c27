//! # Transport Errors
//!
//! [`RequestError`] is what every request rejects with. [`ClientError`]
//! covers building a client from configuration.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Message used when neither the server nor the status line explains a failure.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while sending the request";

/// A failed request.
///
/// `status` is `0` when no response was received.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct RequestError {
    pub status: u16,
    pub message: String,
    /// The `errors` array of a JSON:API error document, when the body had one.
    pub errors_from_server: Option<Vec<Value>>,
    /// The raw body, when it was not empty.
    pub response_text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorDocument {
    #[serde(default)]
    errors: Option<Vec<Value>>,
}

impl RequestError {
    /// Builds the failure for a non-success response.
    ///
    /// The message is the `title` of the only entry of a JSON:API `errors`
    /// array, else the status text, else [`GENERIC_ERROR_MESSAGE`].
    pub fn from_response(status: u16, status_text: Option<&str>, body: &str) -> Self {
        let errors_from_server = serde_json::from_str::<ErrorDocument>(body)
            .ok()
            .and_then(|document| document.errors);

        let title = errors_from_server
            .as_deref()
            .filter(|errors| errors.len() == 1)
            .and_then(|errors| errors[0].get("title"))
            .and_then(Value::as_str)
            .filter(|title| !title.is_empty());
        let message = title
            .or(status_text.filter(|text| !text.is_empty()))
            .unwrap_or(GENERIC_ERROR_MESSAGE)
            .to_owned();

        Self {
            status,
            message,
            errors_from_server,
            response_text: (!body.is_empty()).then(|| body.to_owned()),
        }
    }

    /// No response was received.
    pub fn network() -> Self {
        Self {
            status: 0,
            message: GENERIC_ERROR_MESSAGE.to_owned(),
            errors_from_server: None,
            response_text: None,
        }
    }

    /// The request could not be addressed.
    pub fn invalid_url(url: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            status: 0,
            message: format!("invalid request url `{url}`: {reason}"),
            errors_from_server: None,
            response_text: None,
        }
    }

    pub fn is_network(&self) -> bool {
        self.status == 0
    }
}

/// Errors building a client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_server_error_title_becomes_the_message() {
        let err = RequestError::from_response(404, Some("Not Found"), r#"{"errors":[{"title":"Not found"}]}"#);
        assert_eq!(err.status, 404);
        assert_eq!(err.message, "Not found");
        assert_eq!(err.errors_from_server, Some(vec![json!({"title": "Not found"})]));
        assert_eq!(err.response_text.as_deref(), Some(r#"{"errors":[{"title":"Not found"}]}"#));
        assert_eq!(err.to_string(), "Not found");
    }

    #[test]
    fn several_server_errors_fall_back_to_status_text() {
        let body = r#"{"errors":[{"title":"a"},{"title":"b"}]}"#;
        let err = RequestError::from_response(422, Some("Unprocessable Entity"), body);
        assert_eq!(err.message, "Unprocessable Entity");
        assert_eq!(err.errors_from_server.map(|e| e.len()), Some(2));
    }

    #[test]
    fn unreadable_body_falls_back_to_generic_message() {
        let err = RequestError::from_response(500, None, "<html>boom</html>");
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
        assert!(err.errors_from_server.is_none());
        assert_eq!(err.response_text.as_deref(), Some("<html>boom</html>"));

        let empty = RequestError::from_response(503, Some(""), "");
        assert_eq!(empty.message, GENERIC_ERROR_MESSAGE);
        assert!(empty.response_text.is_none());
    }

    #[test]
    fn network_failures_have_status_zero() {
        let err = RequestError::network();
        assert!(err.is_network());
        assert_eq!(err.message, GENERIC_ERROR_MESSAGE);
    }
}
