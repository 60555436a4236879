use axum::{routing::get, Router};

pub mod admin;
pub mod items;
pub mod movements;
pub mod system;

/// Router for every endpoint behind the admin-session middleware.
pub fn router() -> Router {
    Router::new()
        .route("/movements", get(movements::list_movements))
        .nest("/items", items::router())
        .nest("/admin", admin::router())
}
