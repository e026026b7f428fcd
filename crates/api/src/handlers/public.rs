//! Handlers for the anonymous public surface.
//!
//! Nothing here reads request metadata (IP, user agent, cookies) and no
//! response carries suggestion content, replies, or assignments.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ghost_core::stats::PublicStats;
use ghost_core::suggestion::NewSuggestion;
use ghost_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /suggestions/submit`.
///
/// Unknown fields are rejected so no identifying metadata can ride along.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitRequest {
    pub category: String,
    pub subcategory: String,
    #[serde(alias = "suggestionText")]
    pub suggestion_text: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub id: DbId,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/suggestions/categories
pub async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.taxonomy.to_json_map(),
    })
}

/// POST /api/v1/suggestions/submit
///
/// Store an anonymous suggestion. Returns 201 with the new id only.
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    let new = NewSuggestion::validate(
        &state.taxonomy,
        &input.category,
        &input.subcategory,
        &input.suggestion_text,
    )?;
    let created = state.store.insert_suggestion(&new).await?;

    tracing::info!(suggestion_id = created.id, category = %created.category, "Suggestion submitted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Suggestion submitted successfully",
            id: created.id,
        }),
    ))
}

/// GET /api/v1/suggestions/stats
///
/// Aggregate counts only. A store failure degrades to zero counts.
pub async fn stats(State(state): State<AppState>) -> Json<PublicStats> {
    match state.store.count_by_status().await {
        Ok(counts) => Json(PublicStats::from_counts(&counts)),
        Err(e) => {
            tracing::warn!(error = %e, "Public stats unavailable, returning empty counts");
            Json(PublicStats::empty())
        }
    }
}
