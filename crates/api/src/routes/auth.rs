//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login            -> login
/// POST /verify           -> verify
/// POST /refresh          -> refresh (requires auth)
/// POST /change-password  -> change_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/verify", post(auth::verify))
        .route("/refresh", post(auth::refresh))
        .route("/change-password", post(auth::change_password))
}
