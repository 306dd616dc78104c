//! Action response DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const RETCODE_OK: i64 = 0;
/// Payload failed the action's check
pub const RETCODE_BAD_REQUEST: i64 = 1400;
/// No handler registered under the requested name
pub const RETCODE_UNSUPPORTED_ACTION: i64 = 1404;

/// Outcome status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Ok,
    Failed,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::Ok => "ok",
            ActionStatus::Failed => "failed",
        }
    }
}

/// Normalized response of every action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub retcode: i64,
    pub status: ActionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    pub fn ok<T: Serialize>(data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                retcode: RETCODE_OK,
                status: ActionStatus::Ok,
                data: Some(data),
                error: None,
            },
            Err(e) => Self::failed(500, format!("Failed to encode response: {}", e)),
        }
    }

    pub fn failed(retcode: i64, message: impl Into<String>) -> Self {
        Self {
            retcode,
            status: ActionStatus::Failed,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ActionStatus::Ok
    }
}

/// Data returned by a successful ring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingData {
    pub call_id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_shape() {
        let response = ActionResponse::ok(RingData {
            call_id: "S1".to_string(),
            message: "ringing".to_string(),
        });
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({ "retcode": 0, "status": "ok", "data": { "call_id": "S1", "message": "ringing" } })
        );
    }

    #[test]
    fn test_failed_shape() {
        let value = serde_json::to_value(ActionResponse::failed(100, "unknown")).unwrap();
        assert_eq!(value, json!({ "retcode": 100, "status": "failed", "error": "unknown" }));
    }
}
