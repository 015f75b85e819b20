use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::{EditorError, Result};

impl EditorError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EditorError::Validation(_) | EditorError::Conflict(_) | EditorError::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            EditorError::Unauthorized => StatusCode::UNAUTHORIZED,
            EditorError::Forbidden(_) => StatusCode::FORBIDDEN,
            EditorError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EditorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status.as_u16(), self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// `{ "success": true }`
pub fn success() -> Json<serde_json::Value> {
    Json(json!({ "success": true }))
}

pub fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(EditorError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

/// Parse a required id from a query string parameter.
pub fn parse_id(value: Option<&str>, field: &str) -> Result<Uuid> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| EditorError::Validation(format!("{field} is required")))?;
    Uuid::parse_str(value).map_err(|_| EditorError::Validation(format!("{field} is not a valid id")))
}
