pub mod admins;
pub mod auth;
pub mod dashboard;
pub mod export;
pub mod health;
pub mod public;
pub mod suggestions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /suggestions/categories                taxonomy (public)
/// /suggestions/submit                    anonymous submission (public)
/// /suggestions/stats                     aggregate counts (public)
///
/// /auth/login                            login (public)
/// /auth/verify                           token check (public)
/// /auth/refresh                          refresh (requires auth)
/// /auth/change-password                  change own password (requires auth)
///
/// /admin/suggestions                     list (view_suggestions)
/// /admin/suggestions/{id}                get, update (manage_suggestions), delete (delete_suggestions)
///
/// /admin/admins                          list (auth), create (manage_admins)
/// /admin/admins/names                    assignment lookup (auth)
/// /admin/admins/{id}                     get (auth), update, deactivate (manage_admins)
///
/// /admin/dashboard/stats                 dashboard statistics (view_analytics)
/// /admin/export                          CSV / Excel export (export_data)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/suggestions", public::router())
        .nest("/auth", auth::router())
        .nest("/admin/suggestions", suggestions::router())
        .nest("/admin/admins", admins::router())
        .nest("/admin/dashboard", dashboard::router())
        .nest("/admin/export", export::router())
}
