//! Suggestion query/filter engine.
//!
//! Filters are optional and conjunctive. The same [`SuggestionFilter`] drives
//! the paginated admin listing, the export engine, and both store backends
//! (the PostgreSQL repository mirrors [`SuggestionFilter::matches`] in SQL).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::suggestion::{Priority, Suggestion, SuggestionStatus};
use crate::types::Timestamp;

/// Default page size when the caller gives none.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Raw filter values as they arrive from a query string or JSON body.
///
/// Empty strings are treated as "not provided".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search: Option<String>,
}

/// Parsed, validated filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub status: Option<SuggestionStatus>,
    pub priority: Option<Priority>,
    /// Inclusive lower bound on `created_at`.
    pub start_date: Option<Timestamp>,
    /// Inclusive upper bound on `created_at`.
    pub end_date: Option<Timestamp>,
    /// Case-insensitive substring over text, category and subcategory.
    pub search: Option<String>,
}

impl FilterParams {
    pub fn parse(&self) -> Result<SuggestionFilter, CoreError> {
        let filter = SuggestionFilter {
            category: non_empty(&self.category),
            subcategory: non_empty(&self.subcategory),
            status: non_empty(&self.status)
                .map(|s| SuggestionStatus::from_str(&s))
                .transpose()?,
            priority: non_empty(&self.priority)
                .map(|p| Priority::from_str(&p))
                .transpose()?,
            start_date: non_empty(&self.start_date)
                .map(|d| parse_date_bound(&d, DateBound::Start))
                .transpose()?,
            end_date: non_empty(&self.end_date)
                .map(|d| parse_date_bound(&d, DateBound::End))
                .transpose()?,
            search: non_empty(&self.search),
        };
        filter.validate()?;
        Ok(filter)
    }
}

impl SuggestionFilter {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.subcategory.is_some() && self.category.is_none() {
            return Err(CoreError::Validation(
                "Subcategory filter requires a category filter".into(),
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(CoreError::Validation(
                    "start_date must not be after end_date".into(),
                ));
            }
        }
        Ok(())
    }

    /// Lower-cased search needle, if any.
    ///
    /// Matching uses Unicode `to_lowercase`, which equals Postgres `ILIKE` for
    /// ASCII text. A few non-ASCII case mappings may match on one backend
    /// and not the other.
    pub fn search_needle(&self) -> Option<String> {
        self.search.as_ref().map(|s| s.to_lowercase())
    }

    pub fn matches(&self, s: &Suggestion) -> bool {
        if self.category.as_ref().is_some_and(|c| *c != s.category) {
            return false;
        }
        if self.subcategory.as_ref().is_some_and(|c| *c != s.subcategory) {
            return false;
        }
        if self.status.is_some_and(|st| st != s.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != s.priority) {
            return false;
        }
        if self.start_date.is_some_and(|d| s.created_at < d) {
            return false;
        }
        if self.end_date.is_some_and(|d| s.created_at > d) {
            return false;
        }
        if let Some(needle) = self.search_needle() {
            let hit = s.suggestion_text.to_lowercase().contains(&needle)
                || s.category.to_lowercase().contains(&needle)
                || s.subcategory.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

/// Parse `YYYY-MM-DD` (start or end of that UTC day) or an RFC 3339 timestamp.
pub fn parse_date_bound(value: &str, bound: DateBound) -> Result<Timestamp, CoreError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let time = match bound {
            DateBound::Start => date.and_hms_opt(0, 0, 0),
            DateBound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
        };
        return time
            .map(|t| t.and_utc())
            .ok_or_else(|| CoreError::Validation(format!("Invalid date '{value}'")));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            CoreError::Validation(format!(
                "Invalid date '{value}'. Expected YYYY-MM-DD or RFC 3339"
            ))
        })
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Status,
    Priority,
    Category,
}

impl SortField {
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "category" => Ok(Self::Category),
            other => Err(CoreError::Validation(format!(
                "Unknown sort field '{other}'. Valid fields: created_at, updated_at, status, priority, category"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(CoreError::Validation(format!(
                "Unknown sort order '{other}'. Use asc or desc"
            ))),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sort field and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn parse(sort_by: Option<&str>, sort_order: Option<&str>) -> Result<Self, CoreError> {
        let field = match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => SortField::from_str(s)?,
            None => SortField::default(),
        };
        let order = match sort_order.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => SortOrder::from_str(s)?,
            None => SortOrder::default(),
        };
        Ok(Self { field, order })
    }

    /// Ordering of two suggestions. Ties break on id, newest id first.
    pub fn compare(&self, a: &Suggestion, b: &Suggestion) -> std::cmp::Ordering {
        let primary = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Status => a.status.cmp(&b.status),
            SortField::Priority => a.priority.cmp(&b.priority),
            SortField::Category => a.category.cmp(&b.category),
        };
        let primary = match self.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| b.id.cmp(&a.id))
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// A 1-indexed page request with a clamped page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Clamp caller-supplied values: page to `>= 1`, size to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, page_size: Option<i64>, default_size: u32) -> Self {
        let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
        let page_size = page_size
            .unwrap_or(i64::from(default_size))
            .clamp(1, i64::from(MAX_PAGE_SIZE)) as u32;
        Self { page, page_size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub page_size: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageInfo {
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(request.page_size));
        let total_pages = u32::try_from(total_pages).unwrap_or(u32::MAX);
        Self {
            current_page: request.page,
            total_pages,
            total_items,
            page_size: request.page_size,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}

/// One page of results. An empty page is a valid response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

// ---------------------------------------------------------------------------
// In-memory evaluation
// ---------------------------------------------------------------------------

/// Every suggestion matching `filter`, ordered by `sort`. No pagination.
pub fn filter_sorted<'a, I>(items: I, filter: &SuggestionFilter, sort: SortSpec) -> Vec<Suggestion>
where
    I: IntoIterator<Item = &'a Suggestion>,
{
    let mut matched: Vec<Suggestion> = items
        .into_iter()
        .filter(|s| filter.matches(s))
        .cloned()
        .collect();
    matched.sort_by(|a, b| sort.compare(a, b));
    matched
}

/// Filter, sort, and cut one page out of `items`.
pub fn paginate<'a, I>(
    items: I,
    filter: &SuggestionFilter,
    sort: SortSpec,
    request: PageRequest,
) -> Page<Suggestion>
where
    I: IntoIterator<Item = &'a Suggestion>,
{
    let matched = filter_sorted(items, filter, sort);
    let pagination = PageInfo::new(request, matched.len() as u64);
    let items = matched
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.page_size as usize)
        .collect();
    Page { items, pagination }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::suggestion::ALL_STATUSES;

    fn base() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap()
    }

    fn make(id: i64, category: &str, sub: &str, text: &str) -> Suggestion {
        let at = base() + Duration::hours(id);
        Suggestion {
            id,
            category: category.into(),
            subcategory: sub.into(),
            suggestion_text: text.into(),
            status: SuggestionStatus::Pending,
            priority: Priority::Medium,
            assigned_to: None,
            reply: None,
            actual_resolution_date: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn population(n: i64) -> Vec<Suggestion> {
        (1..=n)
            .map(|i| {
                let mut s = make(i, "Workplace", "Safety", &format!("suggestion number {i}"));
                s.status = ALL_STATUSES[(i as usize) % ALL_STATUSES.len()];
                s
            })
            .collect()
    }

    #[test]
    fn forty_five_items_make_three_pages_of_twenty() {
        let items = population(45);
        let filter = SuggestionFilter::default();
        for page in 1..=3u32 {
            let req = PageRequest::new(Some(i64::from(page)), Some(20), DEFAULT_PAGE_SIZE);
            let result = paginate(&items, &filter, SortSpec::default(), req);
            assert_eq!(result.pagination.total_items, 45);
            assert_eq!(result.pagination.total_pages, 3);
            assert_eq!(result.pagination.has_next_page, page < 3);
            assert_eq!(result.pagination.has_prev_page, page > 1);
            let expected_len = if page == 3 { 5 } else { 20 };
            assert_eq!(result.items.len(), expected_len);
        }
    }

    #[test]
    fn status_filter_returns_only_that_status() {
        let items = population(30);
        for status in ALL_STATUSES {
            let filter = SuggestionFilter {
                status: Some(*status),
                ..SuggestionFilter::default()
            };
            let matched = filter_sorted(&items, &filter, SortSpec::default());
            assert!(!matched.is_empty());
            assert!(matched.iter().all(|s| s.status == *status));
        }
    }

    #[test]
    fn default_sort_is_newest_first() {
        let items = population(5);
        let result = filter_sorted(&items, &SuggestionFilter::default(), SortSpec::default());
        let ids: Vec<_> = result.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn priority_sorts_by_severity() {
        let mut items = population(4);
        items[0].priority = Priority::Critical;
        items[1].priority = Priority::Low;
        items[2].priority = Priority::High;
        items[3].priority = Priority::Medium;
        let sort = SortSpec::parse(Some("priority"), Some("asc")).unwrap();
        let result = filter_sorted(&items, &SuggestionFilter::default(), sort);
        let prios: Vec<_> = result.iter().map(|s| s.priority).collect();
        assert_eq!(
            prios,
            vec![Priority::Low, Priority::Medium, Priority::High, Priority::Critical]
        );
    }

    #[test]
    fn search_is_case_insensitive_over_text_and_taxonomy() {
        let items = vec![
            make(1, "Workplace", "Safety", "The STAIRWELL lighting is broken"),
            make(2, "Technology", "Software", "Upgrade the laptops please"),
            make(3, "Culture", "Events", "More team lunches"),
        ];
        let by_text = SuggestionFilter {
            search: Some("stairwell".into()),
            ..SuggestionFilter::default()
        };
        assert_eq!(filter_sorted(&items, &by_text, SortSpec::default()).len(), 1);

        let by_category = SuggestionFilter {
            search: Some("TECHNO".into()),
            ..SuggestionFilter::default()
        };
        let matched = filter_sorted(&items, &by_category, SortSpec::default());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, 2);
    }

    #[test]
    fn filters_combine_with_and() {
        let mut items = vec![
            make(1, "Workplace", "Safety", "first suggestion text"),
            make(2, "Workplace", "Facilities", "second suggestion text"),
            make(3, "Workplace", "Safety", "third suggestion text"),
        ];
        items[2].priority = Priority::High;
        let filter = SuggestionFilter {
            category: Some("Workplace".into()),
            subcategory: Some("Safety".into()),
            priority: Some(Priority::High),
            ..SuggestionFilter::default()
        };
        let matched = filter_sorted(&items, &filter, SortSpec::default());
        assert_eq!(matched.iter().map(|s| s.id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let items = population(5);
        let filter = SuggestionFilter {
            start_date: Some(items[1].created_at),
            end_date: Some(items[3].created_at),
            ..SuggestionFilter::default()
        };
        let ids: Vec<_> = filter_sorted(&items, &filter, SortSpec::default())
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![4, 3, 2]);
    }

    #[test]
    fn date_only_end_bound_covers_whole_day() {
        let end = parse_date_bound("2026-01-10", DateBound::End).unwrap();
        let start = parse_date_bound("2026-01-10", DateBound::Start).unwrap();
        assert!(end > base());
        assert!(start < base());
        assert!(parse_date_bound("2026-01-10T08:00:00Z", DateBound::Start).is_ok());
        assert!(parse_date_bound("10/01/2026", DateBound::Start).is_err());
    }

    #[test]
    fn params_treat_empty_strings_as_absent() {
        let params = FilterParams {
            category: Some(String::new()),
            status: Some("  ".into()),
            ..FilterParams::default()
        };
        assert_eq!(params.parse().unwrap(), SuggestionFilter::default());
    }

    #[test]
    fn params_reject_unknown_status_and_orphan_subcategory() {
        let bad_status = FilterParams {
            status: Some("Closed".into()),
            ..FilterParams::default()
        };
        assert_matches!(bad_status.parse(), Err(CoreError::Validation(_)));

        let orphan = FilterParams {
            subcategory: Some("Safety".into()),
            ..FilterParams::default()
        };
        assert_matches!(orphan.parse(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let params = FilterParams {
            start_date: Some("2026-02-01".into()),
            end_date: Some("2026-01-01".into()),
            ..FilterParams::default()
        };
        assert!(params.parse().is_err());
    }

    #[test]
    fn empty_result_is_a_valid_page() {
        let filter = SuggestionFilter {
            search: Some("nothing matches this".into()),
            ..SuggestionFilter::default()
        };
        let result = paginate(&population(3), &filter, SortSpec::default(), PageRequest::default());
        assert!(result.items.is_empty());
        assert_eq!(result.pagination.total_items, 0);
        assert_eq!(result.pagination.total_pages, 0);
        assert!(!result.pagination.has_next_page);
        assert!(!result.pagination.has_prev_page);
    }

    #[test]
    fn page_request_clamps_values() {
        let req = PageRequest::new(Some(0), Some(1000), DEFAULT_PAGE_SIZE);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, MAX_PAGE_SIZE);
        let req = PageRequest::new(None, None, 15);
        assert_eq!(req.page_size, 15);
        assert_eq!(PageRequest::new(Some(3), Some(20), 20).offset(), 40);
    }

    #[test]
    fn sort_parse_accepts_camel_case_and_rejects_unknown() {
        assert_eq!(
            SortSpec::parse(Some("createdAt"), Some("ASC")).unwrap(),
            SortSpec {
                field: SortField::CreatedAt,
                order: SortOrder::Asc
            }
        );
        assert!(SortSpec::parse(Some("reply"), None).is_err());
        assert!(SortSpec::parse(None, Some("sideways")).is_err());
    }
}
