//! Uniform API response envelope

use serde::{Deserialize, Serialize};

/// Client-facing envelope shared by every JSON endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T = serde_json::Value> {
    /// Payload; null on errors and on payload-free successes
    pub data: Option<T>,
    pub success: bool,
    pub message: String,
    pub status_code: u16,
}

impl<T> ApiResponse<T> {
    /// Success envelope wrapping a payload
    pub fn success(data: T, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            data: Some(data),
            success: true,
            message: message.into(),
            status_code,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Success envelope with a null payload
    pub fn empty(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            data: None,
            success: true,
            message: message.into(),
            status_code,
        }
    }

    /// Error envelope: data forced to null, success forced to false
    pub fn error(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            data: None,
            success: false,
            message: message.into(),
            status_code,
        }
    }
}
