//! Handler for `POST /admin/export`.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ghost_core::export::{export as render_export, ExportFormat, ExportOptions};
use ghost_core::query::{FilterParams, SortSpec};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireExportData;
use crate::state::AppState;

/// Request body for `POST /admin/export`.
#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    #[serde(default)]
    pub filters: FilterParams,
    /// Overrides `EXPORT_INCLUDE_REPLY` for this export.
    pub include_reply: Option<bool>,
}

/// POST /api/v1/admin/export
///
/// Renders the full filtered set (no pagination) as an attachment. Read-only.
/// `"excel"` is served as an OOXML workbook named `suggestions_export.xlsx`.
pub async fn export(
    State(state): State<AppState>,
    RequireExportData(user): RequireExportData,
    Json(input): Json<ExportRequest>,
) -> AppResult<Response> {
    let filter = input.filters.parse()?;
    let suggestions = state
        .store
        .list_suggestions(&filter, SortSpec::default())
        .await?;

    let options = ExportOptions {
        include_reply: input
            .include_reply
            .unwrap_or(state.config.export_include_reply),
    };
    let file = render_export(&user.actor(), &suggestions, input.format, options)?;

    tracing::info!(
        admin_id = user.account.id,
        format = file.format.extension(),
        rows = file.rows,
        include_reply = options.include_reply,
        "Suggestions exported",
    );

    let disposition = format!("attachment; filename=\"{}\"", file.filename());
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
