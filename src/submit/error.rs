use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

/// Error body returned by the backend: `{statusCode, error, message}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    #[serde(default, deserialize_with = "lenient")]
    pub status_code: Option<u16>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<ApiMessage>,
}

/// Decorative fields of foreign shape read as `None` instead of failing the
/// whole body.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiMessage {
    Text(String),
    Fields(Vec<FieldMessage>),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMessage {
    pub field: String,
    pub message: String,
}

impl ApiErrorBody {
    /// Text for a notification: field messages as `field: message` lines,
    /// or the plain message. `None` when the body carries neither.
    pub fn notification_text(&self) -> Option<String> {
        match self.message.as_ref()? {
            ApiMessage::Text(text) => Some(text.clone()),
            ApiMessage::Fields(items) => Some(
                items
                    .iter()
                    .map(|item| format!("{}: {}", item.field, item.message))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            ApiMessage::Other(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed with status {status}")]
    Api {
        status: u16,
        body: Option<ApiErrorBody>,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to read upload {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn api(status: u16, body: Option<ApiErrorBody>) -> Self {
        StoreError::Api { status, body }
    }

    /// Build an API error from a raw response body, keeping it only when it
    /// decodes as an [`ApiErrorBody`].
    pub fn from_response(status: u16, raw: &str) -> Self {
        let body = serde_json::from_str::<ApiErrorBody>(raw).ok();
        StoreError::Api { status, body }
    }

    pub fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            StoreError::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn field_messages_join_into_lines() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "statusCode": 400,
            "error": "Bad Request",
            "message": [
                {"field": "slug", "message": "taken"},
                {"field": "title", "message": "too short"}
            ]
        }))
        .unwrap();
        assert_eq!(body.status_code, Some(400));
        assert_eq!(
            body.notification_text().as_deref(),
            Some("slug: taken\ntitle: too short")
        );
    }

    #[test]
    fn plain_message_is_used_directly() {
        let err = StoreError::from_response(409, r#"{"message": "Already exists"}"#);
        assert_eq!(
            err.body().and_then(ApiErrorBody::notification_text).as_deref(),
            Some("Already exists")
        );
    }

    #[test]
    fn odd_status_and_error_fields_keep_the_message() {
        let err = StoreError::from_response(
            400,
            r#"{"statusCode": "400", "error": {"code": 7}, "message": [{"field": "slug", "message": "taken"}]}"#,
        );
        let body = err.body().expect("body decodes");
        assert_eq!(body.status_code, None);
        assert_eq!(body.error, None);
        assert_eq!(body.notification_text().as_deref(), Some("slug: taken"));
    }

    #[test]
    fn unknown_message_shape_has_no_text() {
        let err = StoreError::from_response(500, r#"{"message": {"nested": true}}"#);
        assert!(err.body().unwrap().notification_text().is_none());
        assert!(StoreError::from_response(502, "<html>").body().is_none());
    }
}
