use axum::routing::post;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Routes mounted at `/admin/export`.
///
/// ```text
/// POST /  -> export
/// ```
///
/// `format: "csv"` downloads `suggestions_export.csv`; `format: "excel"`
/// downloads an OOXML `suggestions_export.xlsx`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(export::export))
}
