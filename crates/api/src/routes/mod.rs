//! API route definitions and the shared JSON envelope.
//!
//! Every response carries a `success` flag. Failures add an `error` code
//! and a human-readable `message`; partially-applied writes succeed with
//! a `warning` field describing the skipped follow-up.

use axum::{Json, Router, http::StatusCode, response::Response};
use cogest_shared::AppError;
use serde_json::{Value, json};

use crate::AppState;

pub mod caisse;
pub mod charges;
pub mod clients;
pub mod depenses;
pub mod health;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(clients::routes())
        .merge(charges::routes())
        .merge(caisse::routes())
        .merge(depenses::routes())
}

/// Wraps a JSON object in the success envelope.
pub(crate) fn success(status: StatusCode, mut body: Value) -> Response {
    use axum::response::IntoResponse;

    if let Some(obj) = body.as_object_mut() {
        obj.insert("success".to_string(), json!(true));
    }
    (status, Json(body)).into_response()
}

/// Renders an application error in the failure envelope.
pub(crate) fn failure(err: &AppError) -> Response {
    use axum::response::IntoResponse;

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "success": false,
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_merges_flag() {
        let response = success(StatusCode::OK, json!({ "solde": "10.000" }));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_failure_maps_status() {
        let response = failure(&AppError::NotFound("client 7".to_string()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = failure(&AppError::InsufficientFunds("100 < 150".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
