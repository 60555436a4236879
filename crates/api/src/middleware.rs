use axum::{http::HeaderMap, middleware::Next, response::Response};

use stockbook_auth::AdminSession;

/// Header carrying the admin passphrase.
pub const ADMIN_HEADER: &str = "x-admin-passphrase";

/// Lift whatever admin passphrase the caller presented into an
/// [`AdminSession`] extension.
///
/// Nothing is validated here; gated operations check the session themselves
/// on every call.
pub async fn admin_session_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let session = session_from_headers(req.headers());
    req.extensions_mut().insert(session);
    next.run(req).await
}

fn session_from_headers(headers: &HeaderMap) -> AdminSession {
    headers
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(AdminSession::with_passphrase)
        .unwrap_or_else(AdminSession::anonymous)
}
