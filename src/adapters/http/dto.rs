//! Response envelope shared by every endpoint.
//!
//! ```json
//! {"status": "success", "data": {...}, "message": "Operation completed successfully"}
//! {"status": "error", "message": "Invalid email format", "data": {}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SUCCESS_MESSAGE: &str = "Operation completed successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// JSON envelope around every response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

impl ApiResponse<Value> {
    /// Error envelope with an empty `data` object.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: Value::Object(Map::new()),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_shape() {
        let value = serde_json::to_value(ApiResponse::success(json!({"id": 1}))).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "success",
                "data": {"id": 1},
                "message": "Operation completed successfully",
            })
        );
    }

    #[test]
    fn error_envelope_has_empty_data_object() {
        let value = serde_json::to_value(ApiResponse::error("Invalid email format")).unwrap();
        assert_eq!(
            value,
            json!({"status": "error", "message": "Invalid email format", "data": {}})
        );
    }
}
