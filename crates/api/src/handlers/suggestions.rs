//! Handlers for the admin `/admin/suggestions` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use ghost_core::error::CoreError;
use ghost_core::query::{FilterParams, Page, PageRequest, SortSpec};
use ghost_core::suggestion::{apply_changes, Suggestion, SuggestionChanges};
use ghost_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{
    RequireDeleteSuggestions, RequireManageSuggestions, RequireViewSuggestions,
};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string for `GET /admin/suggestions`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListParams {
    fn filters(&self) -> FilterParams {
        FilterParams {
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            search: self.search.clone(),
        }
    }
}

/// A non-blocking notice returned next to a successful update.
#[derive(Debug, Serialize)]
pub struct Warning {
    pub code: ghost_core::suggestion::Advisory,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub suggestion: Suggestion,
    pub warnings: Vec<Warning>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/suggestions
///
/// Filtered, sorted, paginated listing. An empty page is a normal result.
pub async fn list(
    State(state): State<AppState>,
    RequireViewSuggestions(_user): RequireViewSuggestions,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Page<Suggestion>>>> {
    let filter = params.filters().parse()?;
    let sort = SortSpec::parse(params.sort_by.as_deref(), params.sort_order.as_deref())?;
    let page = PageRequest::new(params.page, params.limit, state.config.default_page_size);

    let result = state.store.query_suggestions(&filter, sort, page).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/admin/suggestions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireViewSuggestions(_user): RequireViewSuggestions,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Suggestion>>> {
    let suggestion = find_or_404(&state, id).await?;
    Ok(Json(DataResponse { data: suggestion }))
}

/// PUT /api/v1/admin/suggestions/{id}
///
/// Apply any subset of status, priority, assignment and reply. Empty
/// `assigned_to` / `reply` strings clear the field.
pub async fn update(
    State(state): State<AppState>,
    RequireManageSuggestions(user): RequireManageSuggestions,
    Path(id): Path<DbId>,
    Json(changes): Json<SuggestionChanges>,
) -> AppResult<Json<DataResponse<UpdateResponse>>> {
    let mut suggestion = find_or_404(&state, id).await?;
    let advisories = apply_changes(&mut suggestion, &changes, &user.actor(), Utc::now())?;

    let saved = state
        .store
        .save_suggestion(&suggestion)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Suggestion",
            id,
        }))?;

    tracing::info!(
        admin_id = user.account.id,
        suggestion_id = id,
        status = %saved.status.as_str(),
        "Suggestion updated",
    );

    Ok(Json(DataResponse {
        data: UpdateResponse {
            suggestion: saved,
            warnings: advisories
                .into_iter()
                .map(|a| Warning {
                    code: a,
                    message: a.message(),
                })
                .collect(),
        },
    }))
}

/// DELETE /api/v1/admin/suggestions/{id}
///
/// Hard delete. Returns 204 No Content.
pub async fn delete(
    State(state): State<AppState>,
    RequireDeleteSuggestions(user): RequireDeleteSuggestions,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !state.store.delete_suggestion(id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Suggestion",
            id,
        }));
    }
    tracing::info!(admin_id = user.account.id, suggestion_id = id, "Suggestion deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_or_404(state: &AppState, id: DbId) -> AppResult<Suggestion> {
    state
        .store
        .find_suggestion(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Suggestion",
            id,
        }))
}
