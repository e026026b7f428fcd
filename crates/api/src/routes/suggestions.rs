//! Route definitions for `/admin/suggestions`.

use axum::routing::get;
use axum::Router;

use crate::handlers::suggestions;
use crate::state::AppState;

/// Routes mounted at `/admin/suggestions`.
///
/// ```text
/// GET    /      -> list
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(suggestions::list)).route(
        "/{id}",
        get(suggestions::get_by_id)
            .put(suggestions::update)
            .delete(suggestions::delete),
    )
}
