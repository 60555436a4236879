use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use stockbook_inventory::{Adjustment, GenreFilter};

use crate::app::services::{AppServices, run_blocking};
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items))
        .route("/:name/quantity", put(set_quantity))
        .route("/:name/consume", post(consume))
        .route("/:name/restock", post(restock))
}

/// Current catalog. A store problem shows up as `notice`, not an error status.
pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ItemsQuery>,
) -> axum::response::Response {
    let filter = GenreFilter::from_query(query.genre.as_deref());
    let catalog = run_blocking(services, |s| Ok(s.catalog())).await;
    match catalog {
        Ok(catalog) => Json(dto::ItemsResponse::build(&catalog, &filter)).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn set_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
    Json(body): Json<dto::SetQuantityRequest>,
) -> axum::response::Response {
    match run_blocking(services, move |s| s.set_quantity(&name, body.quantity)).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}

pub async fn consume(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
    Json(body): Json<dto::AdjustRequest>,
) -> axum::response::Response {
    adjust(services, name, Adjustment::Consume(body.amount)).await
}

pub async fn restock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
    Json(body): Json<dto::AdjustRequest>,
) -> axum::response::Response {
    adjust(services, name, Adjustment::Restock(body.amount)).await
}

async fn adjust(
    services: Arc<AppServices>,
    name: String,
    adjustment: Adjustment,
) -> axum::response::Response {
    match run_blocking(services, move |s| s.adjust(&name, adjustment)).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => errors::inventory_error_to_response(e),
    }
}
