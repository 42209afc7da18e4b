//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper.
///
/// Serialized as `{statusCode, data, message, success}`; the HTTP status of
/// the response equals `statusCode`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a response with an explicit status.
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.as_u16() < 400,
        }
    }

    /// Create a `200 OK` response.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, message)
    }

    /// Create a `201 Created` response.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, data, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_follows_status() {
        assert!(ApiResponse::ok((), "fine").success);
        assert!(!ApiResponse::new(StatusCode::NOT_FOUND, (), "gone").success);
    }

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::created(1, "Made")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"statusCode": 201, "data": 1, "message": "Made", "success": true})
        );
    }

    #[test]
    fn test_http_status_matches_envelope() {
        let response = ApiResponse::created("x", "Made").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
