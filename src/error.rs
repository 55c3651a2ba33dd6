//! Errors surfaced by the backend client, with the bilingual text the UI shows for them.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

const NETWORK_ERROR_KN: &str = "ಜಾಲ ದೋಷ. ಸರ್ವರ್ ಚಾಲನೆಯಲ್ಲಿದೆಯೇ ಪರಿಶೀಲಿಸಿ";
const NETWORK_ERROR_EN: &str = "Network error. Please check if backend is running.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Backend answered with a non-2xx status.
    #[error("{status}{}", body_suffix(.body))]
    Status {
        status: u16,
        detail: Option<String>,
        body: Option<String>,
    },
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Request was sent but no response came back.
    #[error("no response: {0}")]
    NoResponse(String),
    /// Request could not be built.
    #[error("request setup error: {0}")]
    Setup(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref().map(|b| format!(": {}", b)).unwrap_or_default()
}

impl ApiError {
    /// Build a status error from a raw response body, pulling out a FastAPI `detail` if present.
    pub fn from_status(status: u16, body: String) -> Self {
        let body = body.trim();
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").cloned())
            .and_then(|d| match d {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
                serde_json::Value::Null => None,
                serde_json::Value::String(_) => None,
                other => Some(other.to_string()),
            });
        ApiError::Status {
            status,
            detail,
            body: if body.is_empty() { None } else { Some(body.to_string()) },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Timeout(_) | ApiError::NoResponse(_))
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Status { .. } => "status",
            ApiError::Timeout(_) => "timeout",
            ApiError::NoResponse(_) => "no_response",
            ApiError::Setup(_) => "setup",
            ApiError::Decode(_) => "decode",
        }
    }

    /// Most actionable line for the user: server detail, then status, then a network hint.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { detail: Some(d), .. } => d.clone(),
            ApiError::Status { status, .. } => format!("Request failed with status code {}", status),
            ApiError::Timeout(_) | ApiError::NoResponse(_) => {
                format!("{}\n{}", NETWORK_ERROR_KN, NETWORK_ERROR_EN)
            }
            other => other.to_string(),
        }
    }

    /// Alert shown when analyzing a card fails.
    pub fn analysis_alert(&self) -> Alert {
        Alert {
            title: "ದೋಷ / Error".to_string(),
            message: format!(
                "ಚಿತ್ರವನ್ನು ವಿಶ್ಲೇಷಿಸಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ\nFailed to analyze image\n\n{}",
                self.user_message()
            ),
            button: "ಸರಿ / OK".to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::Setup(err.to_string())
        } else if err.is_timeout() {
            ApiError::Timeout(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Status { status: status.as_u16(), detail: None, body: None }
        } else {
            ApiError::NoResponse(err.to_string())
        }
    }
}

impl Serialize for ApiError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ApiError", 4)?;
        s.serialize_field("kind", self.kind())?;
        s.serialize_field("status", &self.status())?;
        s.serialize_field("message", &self.user_message())?;
        s.serialize_field("error", &self.to_string())?;
        s.end()
    }
}

/// Bilingual modal alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub button: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_extracts_fastapi_detail() {
        let err = ApiError::from_status(404, r#"{"detail": "Image not found"}"#.to_string());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.user_message(), "Image not found");
        assert!(!err.is_connectivity());
    }

    #[test]
    fn status_error_without_detail_reports_status() {
        let err = ApiError::from_status(500, "Internal Server Error".to_string());
        match &err {
            ApiError::Status { detail, body, .. } => {
                assert!(detail.is_none());
                assert_eq!(body.as_deref(), Some("Internal Server Error"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(err.user_message(), "Request failed with status code 500");
    }

    #[test]
    fn empty_body_is_none() {
        let err = ApiError::from_status(502, "  ".to_string());
        assert!(matches!(err, ApiError::Status { body: None, detail: None, .. }));
        assert_eq!(err.to_string(), "502");
    }

    #[test]
    fn validation_detail_list_is_stringified() {
        let err = ApiError::from_status(422, r#"{"detail": [{"msg": "field required"}]}"#.to_string());
        assert!(err.user_message().contains("field required"));
    }

    #[test]
    fn connectivity_alert_is_bilingual() {
        let alert = ApiError::NoResponse("connection refused".to_string()).analysis_alert();
        assert_eq!(alert.title, "ದೋಷ / Error");
        assert!(alert.message.starts_with("ಚಿತ್ರವನ್ನು ವಿಶ್ಲೇಷಿಸಲು ಸಾಧ್ಯವಾಗಲಿಲ್ಲ\nFailed to analyze image"));
        assert!(alert.message.contains(NETWORK_ERROR_EN));
        assert!(alert.message.contains(NETWORK_ERROR_KN));
    }

    #[test]
    fn serializes_kind_and_status() {
        let v = serde_json::to_value(ApiError::from_status(400, r#"{"detail":"bad image"}"#.into())).unwrap();
        assert_eq!(v["kind"], "status");
        assert_eq!(v["status"], 400);
        assert_eq!(v["message"], "bad image");
        let v = serde_json::to_value(ApiError::Timeout("t".into())).unwrap();
        assert_eq!(v["kind"], "timeout");
        assert!(v["status"].is_null());
    }
}
