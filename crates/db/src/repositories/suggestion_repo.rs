//! Repository for the `suggestions` table.

use ghost_core::query::{PageRequest, SortField, SortSpec, SuggestionFilter};
use ghost_core::suggestion::{NewSuggestion, Suggestion};
use ghost_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::suggestion::SuggestionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, category, subcategory, suggestion_text, status, priority, \
                       assigned_to, reply, actual_resolution_date, created_at, updated_at";

/// Provides CRUD and filtered listing for suggestions.
pub struct SuggestionRepo;

impl SuggestionRepo {
    /// Insert a new suggestion, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewSuggestion) -> Result<SuggestionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO suggestions (category, subcategory, suggestion_text, status, priority)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SuggestionRow>(&query)
            .bind(&input.category)
            .bind(&input.subcategory)
            .bind(&input.suggestion_text)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SuggestionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM suggestions WHERE id = $1");
        sqlx::query_as::<_, SuggestionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the admin-editable fields.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        suggestion: &Suggestion,
    ) -> Result<Option<SuggestionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE suggestions SET
                status = $2,
                priority = $3,
                assigned_to = $4,
                reply = $5,
                actual_resolution_date = $6,
                updated_at = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SuggestionRow>(&query)
            .bind(suggestion.id)
            .bind(suggestion.status.as_str())
            .bind(suggestion.priority.as_str())
            .bind(&suggestion.assigned_to)
            .bind(&suggestion.reply)
            .bind(suggestion.actual_resolution_date)
            .bind(suggestion.updated_at)
            .fetch_optional(pool)
            .await
    }

    /// Hard delete. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM suggestions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of suggestions matching `filter`.
    pub async fn query(
        pool: &PgPool,
        filter: &SuggestionFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<Vec<SuggestionRow>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_suggestion_filter(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM suggestions {where_clause} \
             ORDER BY {} \
             LIMIT ${bind_idx} OFFSET ${}",
            order_by(sort),
            bind_idx + 1
        );

        let q = bind_values_as(sqlx::query_as::<_, SuggestionRow>(&query), &bind_values);
        q.bind(i64::from(page.page_size))
            .bind(page.offset() as i64)
            .fetch_all(pool)
            .await
    }

    /// Every suggestion matching `filter`, without pagination.
    pub async fn list(
        pool: &PgPool,
        filter: &SuggestionFilter,
        sort: SortSpec,
    ) -> Result<Vec<SuggestionRow>, sqlx::Error> {
        let (where_clause, bind_values, _) = build_suggestion_filter(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM suggestions {where_clause} ORDER BY {}",
            order_by(sort)
        );
        bind_values_as(sqlx::query_as::<_, SuggestionRow>(&query), &bind_values)
            .fetch_all(pool)
            .await
    }

    /// Count suggestions matching `filter` (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &SuggestionFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_suggestion_filter(filter);
        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM suggestions {where_clause}");
        bind_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values)
            .fetch_one(pool)
            .await
    }

    /// `(status, count)` pairs over the whole table.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*)::BIGINT FROM suggestions GROUP BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// `(category, status, count)` triples over the whole table.
    pub async fn count_by_category_status(
        pool: &PgPool,
    ) -> Result<Vec<(String, String, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (String, String, i64)>(
            "SELECT category, status, COUNT(*)::BIGINT FROM suggestions \
             GROUP BY category, status",
        )
        .fetch_all(pool)
        .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built suggestion queries.
enum BindValue {
    Text(String),
    Timestamp(Timestamp),
}

/// Build a WHERE clause and bind values from a [`SuggestionFilter`].
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_suggestion_filter(filter: &SuggestionFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref category) = filter.category {
        conditions.push(format!("category = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(category.clone()));
    }

    if let Some(ref subcategory) = filter.subcategory {
        conditions.push(format!("subcategory = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(subcategory.clone()));
    }

    if let Some(status) = filter.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.as_str().to_string()));
    }

    if let Some(priority) = filter.priority {
        conditions.push(format!("priority = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(priority.as_str().to_string()));
    }

    if let Some(start) = filter.start_date {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(start));
    }

    if let Some(end) = filter.end_date {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(end));
    }

    // ILIKE folds case under the database collation while the in-memory
    // backend uses Rust `to_lowercase`. Both agree on ASCII; some non-ASCII
    // mappings (German sharp s, Turkish dotted I) can differ between them.
    if let Some(ref search) = filter.search {
        conditions.push(format!(
            "(suggestion_text ILIKE ${bind_idx} OR category ILIKE ${bind_idx} \
             OR subcategory ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{}%", escape_like(search))));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// ORDER BY expression matching [`SortSpec::compare`].
fn order_by(sort: SortSpec) -> String {
    let expr = match sort.field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Status => {
            "CASE status WHEN 'Pending' THEN 0 WHEN 'Reviewed' THEN 1 \
             WHEN 'Resolved' THEN 2 ELSE 3 END"
        }
        SortField::Priority => {
            "CASE priority WHEN 'Low' THEN 0 WHEN 'Medium' THEN 1 \
             WHEN 'High' THEN 2 ELSE 3 END"
        }
        SortField::Category => "category COLLATE \"C\"",
    };
    format!("{expr} {}, id DESC", sort.order.as_sql())
}

/// Escape `LIKE` wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_values_as<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use ghost_core::query::SortOrder;
    use ghost_core::suggestion::SuggestionStatus;

    use super::*;

    #[test]
    fn empty_filter_has_no_where_clause() {
        let (clause, values, next) = build_suggestion_filter(&SuggestionFilter::default());
        assert!(clause.is_empty());
        assert!(values.is_empty());
        assert_eq!(next, 1);
    }

    #[test]
    fn filters_are_numbered_in_order() {
        let filter = SuggestionFilter {
            category: Some("Workplace".into()),
            status: Some(SuggestionStatus::Resolved),
            search: Some("light".into()),
            ..SuggestionFilter::default()
        };
        let (clause, values, next) = build_suggestion_filter(&filter);
        assert_eq!(
            clause,
            "WHERE category = $1 AND status = $2 AND (suggestion_text ILIKE $3 OR \
             category ILIKE $3 OR subcategory ILIKE $3)"
        );
        assert_eq!(values.len(), 3);
        assert_eq!(next, 4);
    }

    #[test]
    fn search_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
    }

    #[test]
    fn order_by_always_breaks_ties_on_id() {
        let sort = SortSpec {
            field: SortField::Priority,
            order: SortOrder::Asc,
        };
        let sql = order_by(sort);
        assert!(sql.starts_with("CASE priority"));
        assert!(sql.ends_with("ASC, id DESC"));
        assert_eq!(order_by(SortSpec::default()), "created_at DESC, id DESC");
    }
}
