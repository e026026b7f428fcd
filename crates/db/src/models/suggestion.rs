//! Suggestion row mapping.
//!
//! The entity itself is [`ghost_core::suggestion::Suggestion`]; this module
//! only bridges the text-typed status/priority columns.

use ghost_core::suggestion::{Priority, Suggestion, SuggestionStatus};
use ghost_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::error::StoreError;

/// Raw row from the `suggestions` table.
#[derive(Debug, Clone, FromRow)]
pub struct SuggestionRow {
    pub id: DbId,
    pub category: String,
    pub subcategory: String,
    pub suggestion_text: String,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<String>,
    pub reply: Option<String>,
    pub actual_resolution_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<SuggestionRow> for Suggestion {
    type Error = StoreError;

    fn try_from(row: SuggestionRow) -> Result<Self, Self::Error> {
        let corrupt = |e| StoreError::Corrupt(format!("suggestions.id={}: {e}", row.id));
        let status = SuggestionStatus::from_str(&row.status).map_err(corrupt)?;
        let priority = Priority::from_str(&row.priority).map_err(corrupt)?;
        Ok(Self {
            id: row.id,
            category: row.category,
            subcategory: row.subcategory,
            suggestion_text: row.suggestion_text,
            status,
            priority,
            assigned_to: row.assigned_to,
            reply: row.reply,
            actual_resolution_date: row.actual_resolution_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Convert a batch of rows, failing on the first corrupt one.
pub fn rows_into_suggestions(rows: Vec<SuggestionRow>) -> Result<Vec<Suggestion>, StoreError> {
    rows.into_iter().map(Suggestion::try_from).collect()
}
