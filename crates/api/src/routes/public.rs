//! Route definitions for the public `/suggestions` surface.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/suggestions`.
///
/// ```text
/// GET  /categories  -> categories
/// POST /submit      -> submit
/// GET  /stats       -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(public::categories))
        .route("/submit", post(public::submit))
        .route("/stats", get(public::stats))
}
