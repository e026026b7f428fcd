//! Aggregate counts for the public statistics panel and the admin dashboard.
//!
//! Stores report raw group counts; this module shapes them. No per-record
//! content ever appears in these structures.

use std::collections::HashMap;

use serde::Serialize;

use crate::suggestion::{SuggestionStatus, ALL_STATUSES};
use crate::taxonomy::Taxonomy;

/// Count of suggestions in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: SuggestionStatus,
    pub count: u64,
}

/// Aggregates safe to expose without authentication.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicStats {
    pub total_suggestions: u64,
    pub status_breakdown: Vec<StatusCount>,
}

/// Per-category counts for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub category: String,
    pub total: u64,
    pub pending: u64,
    pub reviewed: u64,
    pub resolved: u64,
    pub escalated: u64,
}

impl CategoryStats {
    fn empty(category: &str) -> Self {
        Self {
            category: category.to_string(),
            total: 0,
            pending: 0,
            reviewed: 0,
            resolved: 0,
            escalated: 0,
        }
    }

    fn add(&mut self, status: SuggestionStatus, count: u64) {
        self.total += count;
        match status {
            SuggestionStatus::Pending => self.pending += count,
            SuggestionStatus::Reviewed => self.reviewed += count,
            SuggestionStatus::Resolved => self.resolved += count,
            SuggestionStatus::Escalated => self.escalated += count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_suggestions: u64,
    pub status_breakdown: Vec<StatusCount>,
    pub category_stats: Vec<CategoryStats>,
    /// Percentage of suggestions no longer Pending, one decimal place.
    pub response_rate: f64,
}

/// One row of a `GROUP BY category, status` count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStatusCount {
    pub category: String,
    pub status: SuggestionStatus,
    pub count: u64,
}

/// Every status in lifecycle order, zero-filled where `counts` has none.
pub fn status_breakdown(counts: &[(SuggestionStatus, u64)]) -> Vec<StatusCount> {
    ALL_STATUSES
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: counts
                .iter()
                .filter(|(s, _)| s == status)
                .map(|(_, c)| *c)
                .sum(),
        })
        .collect()
}

impl PublicStats {
    pub fn from_counts(counts: &[(SuggestionStatus, u64)]) -> Self {
        let status_breakdown = status_breakdown(counts);
        Self {
            total_suggestions: status_breakdown.iter().map(|s| s.count).sum(),
            status_breakdown,
        }
    }

    /// All-zero statistics, served when the store is unreachable.
    pub fn empty() -> Self {
        Self::from_counts(&[])
    }
}

impl DashboardStats {
    /// Build dashboard statistics from category/status group counts.
    ///
    /// Categories are listed in taxonomy order (zero rows included), followed
    /// by any stored category no longer in the taxonomy, alphabetically.
    pub fn build(taxonomy: &Taxonomy, counts: &[CategoryStatusCount]) -> Self {
        let mut by_category: HashMap<&str, CategoryStats> = HashMap::new();
        let mut by_status: Vec<(SuggestionStatus, u64)> = Vec::new();
        for row in counts {
            by_category
                .entry(row.category.as_str())
                .or_insert_with(|| CategoryStats::empty(&row.category))
                .add(row.status, row.count);
            by_status.push((row.status, row.count));
        }

        let mut category_stats = Vec::with_capacity(by_category.len());
        for cat in taxonomy.categories() {
            let stats = by_category
                .remove(cat.name.as_str())
                .unwrap_or_else(|| CategoryStats::empty(&cat.name));
            category_stats.push(stats);
        }
        let mut leftovers: Vec<CategoryStats> = by_category.into_values().collect();
        leftovers.sort_by(|a, b| a.category.cmp(&b.category));
        category_stats.extend(leftovers);

        let status_breakdown = status_breakdown(&by_status);
        let total_suggestions: u64 = status_breakdown.iter().map(|s| s.count).sum();
        let pending = status_breakdown
            .iter()
            .find(|s| s.status == SuggestionStatus::Pending)
            .map_or(0, |s| s.count);

        Self {
            total_suggestions,
            status_breakdown,
            category_stats,
            response_rate: response_rate(total_suggestions, pending),
        }
    }

    /// Zero counts for every taxonomy category, served when the store is
    /// unreachable.
    pub fn empty(taxonomy: &Taxonomy) -> Self {
        Self::build(taxonomy, &[])
    }
}

/// Share of non-Pending suggestions as a percentage, rounded to one decimal.
pub fn response_rate(total: u64, pending: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let responded = total.saturating_sub(pending) as f64;
    (responded * 1000.0 / total as f64).round() / 10.0
}
