//! Route definitions for `/admin/admins`.

use axum::routing::get;
use axum::Router;

use crate::handlers::admins;
use crate::state::AppState;

/// Routes mounted at `/admin/admins`.
///
/// ```text
/// GET    /       -> list
/// POST   /       -> create
/// GET    /names  -> names
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> deactivate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admins::list).post(admins::create))
        .route("/names", get(admins::names))
        .route(
            "/{id}",
            get(admins::get_by_id)
                .put(admins::update)
                .delete(admins::deactivate),
        )
}
