use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
    Json, Router,
};

use stockbook_auth::AdminSession;
use stockbook_inventory::NewItem;

use crate::app::services::{AppServices, run_blocking};
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/items", post(add_item))
        .route("/items/:name", delete(remove_item))
        .route("/usage", post(aggregate_usage))
}

pub async fn add_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<AdminSession>,
    Json(body): Json<NewItem>,
) -> axum::response::Response {
    match run_blocking(services, move |s| s.add_item(&session, &body)).await {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<AdminSession>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match run_blocking(services, move |s| s.remove_item(&session, &name)).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

/// Recompute `monthly_usage`. The body is optional.
pub async fn aggregate_usage(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<AdminSession>,
    body: Option<Json<dto::AggregateRequest>>,
) -> axum::response::Response {
    let window_days = body.and_then(|Json(b)| b.window_days);
    match run_blocking(services, move |s| s.aggregate(&session, window_days)).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
