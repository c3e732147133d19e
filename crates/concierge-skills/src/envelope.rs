//! The uniform `{ success, data | error }` envelope every handler returns.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::HandlerError;

/// Result of a skill invocation as seen by the orchestrator.
///
/// Serializes to `{ "success": true, "data": ..., "timestamp": ... }` or
/// `{ "success": false, "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// RFC 3339 time the response was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl SkillResponse {
    /// A successful response stamped with the current time.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }

    /// A failed response.  Blank messages are replaced so `error` is never
    /// empty.
    pub fn fail(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "skill failed without a message".to_owned()
        } else {
            error
        };
        Self {
            success: false,
            data: None,
            error: Some(error),
            timestamp: None,
        }
    }

    /// Fold a handler result into an envelope.
    pub fn from_result(result: Result<Value, HandlerError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }

    /// Whether this is a failure envelope.
    pub fn is_failure(&self) -> bool {
        !self.success
    }

    /// Render the envelope as a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "success": false, "error": format!("unserializable response: {e}") })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_shape() {
        let v = SkillResponse::ok(json!({"n": 1})).to_value();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["n"], 1);
        assert!(v.get("error").is_none());
        let ts = v["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn fail_shape() {
        let v = SkillResponse::fail("Title is required").to_value();
        assert_eq!(v, json!({"success": false, "error": "Title is required"}));
    }

    #[test]
    fn fail_never_blank() {
        let r = SkillResponse::fail("   ");
        assert!(!r.error.unwrap().is_empty());
    }

    #[test]
    fn from_handler_error() {
        let r = SkillResponse::from_result(Err(HandlerError::InvalidArgs("bad".into())));
        assert!(r.is_failure());
        assert_eq!(r.error.as_deref(), Some("bad"));
    }
}
