use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockbook_core::InventoryError;

pub fn inventory_error_status(err: &InventoryError) -> StatusCode {
    match err {
        InventoryError::Validation(_) => StatusCode::BAD_REQUEST,
        InventoryError::Unauthorized => StatusCode::FORBIDDEN,
        InventoryError::RowNotFound(_) => StatusCode::NOT_FOUND,
        InventoryError::Authentication(_) => StatusCode::BAD_GATEWAY,
        InventoryError::StoreUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn inventory_error_to_response(err: InventoryError) -> axum::response::Response {
    let status = inventory_error_status(&err);
    if status.is_server_error() {
        tracing::warn!(error = %err, "request failed at the table store");
    }
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
