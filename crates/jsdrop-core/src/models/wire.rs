//! JSON bodies of the upload endpoint.
//!
//! Every structured outcome is sent with status 200; the body shape tells them
//! apart. The no-file case is a bare JSON string, not an error object.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body sent when the request carried no file.
pub const NO_FILE_SELECTED_MESSAGE: &str = "Error: No File Selected";

/// Successful upload: the storage key and its public URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredResponse {
    /// Storage key, e.g. `bundle-1700000000000.js`
    pub image: String,
    /// Public location of the stored object
    pub location: String,
}

/// Structured reception error, e.g. `{"code": "LIMIT_FILE_SIZE", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorObject {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Value of the `error` member: a plain message or a coded object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Message(String),
    Coded(ErrorObject),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: ErrorPayload,
}

/// Any body the upload endpoint can answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Stored(StoredResponse),
    Error(ErrorReply),
    Bare(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stored_shape() {
        let body = UploadResponse::Stored(StoredResponse {
            image: "bundle-1700000000000.js".to_string(),
            location: "https://bucket.s3.us-east-1.amazonaws.com/bundle-1700000000000.js"
                .to_string(),
        });
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "image": "bundle-1700000000000.js",
                "location": "https://bucket.s3.us-east-1.amazonaws.com/bundle-1700000000000.js"
            })
        );
    }

    #[test]
    fn test_bare_string_is_not_an_error_object() {
        let body = UploadResponse::Bare(NO_FILE_SELECTED_MESSAGE.to_string());
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!("Error: No File Selected")
        );

        let parsed: UploadResponse = serde_json::from_str("\"Error: No File Selected\"").unwrap();
        assert_eq!(parsed, body);
    }

    #[test]
    fn test_error_payload_variants_parse() {
        let message: UploadResponse =
            serde_json::from_value(json!({"error": "Error: JS Only!"})).unwrap();
        assert_eq!(
            message,
            UploadResponse::Error(ErrorReply {
                error: ErrorPayload::Message("Error: JS Only!".to_string())
            })
        );

        let coded: UploadResponse = serde_json::from_value(json!({
            "error": {"code": "LIMIT_FILE_SIZE", "message": "File too large", "storageErrors": []}
        }))
        .unwrap();
        match coded {
            UploadResponse::Error(ErrorReply {
                error: ErrorPayload::Coded(obj),
            }) => {
                assert_eq!(obj.code, "LIMIT_FILE_SIZE");
                assert_eq!(obj.field, None);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }
}
