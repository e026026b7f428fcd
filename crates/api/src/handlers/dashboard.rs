//! Handler for the admin dashboard statistics.

use axum::extract::State;
use axum::Json;
use ghost_core::stats::DashboardStats;

use crate::middleware::rbac::RequireViewAnalytics;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/dashboard/stats
///
/// A store failure degrades to zero counts instead of failing the page.
pub async fn stats(
    State(state): State<AppState>,
    RequireViewAnalytics(user): RequireViewAnalytics,
) -> Json<DataResponse<DashboardStats>> {
    let data = match state.store.count_by_category_status().await {
        Ok(counts) => DashboardStats::build(&state.taxonomy, &counts),
        Err(e) => {
            tracing::warn!(
                admin_id = user.account.id,
                error = %e,
                "Dashboard stats unavailable, returning empty counts",
            );
            DashboardStats::empty(&state.taxonomy)
        }
    };
    Json(DataResponse { data })
}
