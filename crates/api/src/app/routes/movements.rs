use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    Json,
};

use crate::app::services::{AppServices, run_blocking};
use crate::app::{dto, errors};

const DEFAULT_LIMIT: usize = 100;

/// Ledger entries, most recent first.
pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::MovementsQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    match run_blocking(services, move |s| s.recent_movements(limit)).await {
        Ok(entries) => Json(serde_json::json!({ "movements": entries })).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
