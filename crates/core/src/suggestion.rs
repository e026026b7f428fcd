//! Suggestion record, lifecycle status, and the capability-gated mutations
//! admins perform during triage.
//!
//! Status is a fully connected four-state field: any status may move to any
//! other, and `Resolved` may be reopened. Every mutation requires
//! [`Capability::ManageSuggestions`] and refreshes `updated_at`; a denied
//! mutation leaves the record untouched.
//!
//! A suggestion never records who submitted it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::permissions::{require, Actor, Capability};
use crate::taxonomy::Taxonomy;
use crate::text::{char_len, clean_for_storage};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Minimum suggestion length in characters, after cleaning.
pub const MIN_SUGGESTION_LENGTH: usize = 10;
/// Maximum suggestion length in characters, after cleaning.
pub const MAX_SUGGESTION_LENGTH: usize = 2000;
/// Maximum length of an internal reply.
pub const MAX_REPLY_LENGTH: usize = 5000;
/// Maximum length of the free-text assignee name.
pub const MAX_ASSIGNEE_LENGTH: usize = 101;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_REVIEWED: &str = "Reviewed";
pub const STATUS_RESOLVED: &str = "Resolved";
pub const STATUS_ESCALATED: &str = "Escalated";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_REVIEWED,
    STATUS_RESOLVED,
    STATUS_ESCALATED,
];

/// Four-valued triage state of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SuggestionStatus {
    Pending,
    Reviewed,
    Resolved,
    Escalated,
}

pub const ALL_STATUSES: &[SuggestionStatus] = &[
    SuggestionStatus::Pending,
    SuggestionStatus::Reviewed,
    SuggestionStatus::Resolved,
    SuggestionStatus::Escalated,
];

impl SuggestionStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::Reviewed => STATUS_REVIEWED,
            Self::Resolved => STATUS_RESOLVED,
            Self::Escalated => STATUS_ESCALATED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_REVIEWED => Ok(Self::Reviewed),
            STATUS_RESOLVED => Ok(Self::Resolved),
            STATUS_ESCALATED => Ok(Self::Escalated),
            other => Err(CoreError::Validation(format!(
                "Unknown status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "Low";
pub const PRIORITY_MEDIUM: &str = "Medium";
pub const PRIORITY_HIGH: &str = "High";
pub const PRIORITY_CRITICAL: &str = "Critical";

pub const VALID_PRIORITIES: &[&str] = &[
    PRIORITY_LOW,
    PRIORITY_MEDIUM,
    PRIORITY_HIGH,
    PRIORITY_CRITICAL,
];

/// Admin-assigned severity. Ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => PRIORITY_LOW,
            Self::Medium => PRIORITY_MEDIUM,
            Self::High => PRIORITY_HIGH,
            Self::Critical => PRIORITY_CRITICAL,
        }
    }

    /// Parse from a string, returning an error for unknown priorities.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            PRIORITY_LOW => Ok(Self::Low),
            PRIORITY_MEDIUM => Ok(Self::Medium),
            PRIORITY_HIGH => Ok(Self::High),
            PRIORITY_CRITICAL => Ok(Self::Critical),
            other => Err(CoreError::Validation(format!(
                "Unknown priority: '{other}'. Valid priorities: {}",
                VALID_PRIORITIES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One anonymous submission plus its administrative metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: DbId,
    pub category: String,
    pub subcategory: String,
    pub suggestion_text: String,
    pub status: SuggestionStatus,
    pub priority: Priority,
    /// Free-text display name of the responsible admin.
    pub assigned_to: Option<String>,
    /// Internal note. Admin-only.
    pub reply: Option<String>,
    pub actual_resolution_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A validated public submission, ready to insert.
///
/// Carries no field that could identify the submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    pub category: String,
    pub subcategory: String,
    pub suggestion_text: String,
    pub status: SuggestionStatus,
    pub priority: Priority,
}

impl NewSuggestion {
    /// Validate a public submission against the taxonomy and length bounds.
    ///
    /// The text is cleaned (tags stripped, entities decoded) before the
    /// length check, and the cleaned form is what gets stored.
    pub fn validate(
        taxonomy: &Taxonomy,
        category: &str,
        subcategory: &str,
        suggestion_text: &str,
    ) -> Result<Self, CoreError> {
        let category = category.trim();
        let subcategory = subcategory.trim();
        if category.is_empty() {
            return Err(CoreError::Validation("Category is required".into()));
        }
        if subcategory.is_empty() {
            return Err(CoreError::Validation("Subcategory is required".into()));
        }
        taxonomy.validate(category, subcategory)?;

        let text = clean_for_storage(suggestion_text);
        let len = char_len(&text);
        if len < MIN_SUGGESTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "Suggestion must be at least {MIN_SUGGESTION_LENGTH} characters long"
            )));
        }
        if len > MAX_SUGGESTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "Suggestion must not exceed {MAX_SUGGESTION_LENGTH} characters (got {len})"
            )));
        }

        Ok(Self {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            suggestion_text: text,
            status: SuggestionStatus::Pending,
            priority: Priority::default(),
        })
    }

    /// Materialise the stored record once the store has assigned an id.
    pub fn into_suggestion(self, id: DbId, now: Timestamp) -> Suggestion {
        Suggestion {
            id,
            category: self.category,
            subcategory: self.subcategory,
            suggestion_text: self.suggestion_text,
            status: self.status,
            priority: self.priority,
            assigned_to: None,
            reply: None,
            actual_resolution_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle operations
// ---------------------------------------------------------------------------

/// Set the triage status.
///
/// Does not check that `status` differs from the current one. Entering
/// `Resolved` stamps `actual_resolution_date`; leaving it clears the stamp.
pub fn set_status(
    suggestion: &mut Suggestion,
    status: SuggestionStatus,
    actor: &Actor,
    now: Timestamp,
) -> Result<(), CoreError> {
    require(actor, Capability::ManageSuggestions)?;
    apply_status(suggestion, status, now);
    suggestion.updated_at = now;
    Ok(())
}

/// Set the admin-assigned priority.
pub fn set_priority(
    suggestion: &mut Suggestion,
    priority: Priority,
    actor: &Actor,
    now: Timestamp,
) -> Result<(), CoreError> {
    require(actor, Capability::ManageSuggestions)?;
    suggestion.priority = priority;
    suggestion.updated_at = now;
    Ok(())
}

/// Assign to a responsible admin by display name. An empty name unassigns.
///
/// The name is not resolved against existing accounts.
pub fn assign(
    suggestion: &mut Suggestion,
    admin_name: &str,
    actor: &Actor,
    now: Timestamp,
) -> Result<(), CoreError> {
    require(actor, Capability::ManageSuggestions)?;
    suggestion.assigned_to = normalize_assignee(admin_name)?;
    suggestion.updated_at = now;
    Ok(())
}

/// Set the internal reply. An empty reply clears it.
pub fn set_reply(
    suggestion: &mut Suggestion,
    text: &str,
    actor: &Actor,
    now: Timestamp,
) -> Result<(), CoreError> {
    require(actor, Capability::ManageSuggestions)?;
    suggestion.reply = normalize_reply(text)?;
    suggestion.updated_at = now;
    Ok(())
}

/// A partial admin edit. `None` leaves the field unchanged; `Some("")`
/// clears `assigned_to` / `reply`. Unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestionChanges {
    pub status: Option<SuggestionStatus>,
    pub priority: Option<Priority>,
    #[serde(alias = "assignedTo")]
    pub assigned_to: Option<String>,
    pub reply: Option<String>,
}

impl SuggestionChanges {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
            && self.reply.is_none()
    }
}

/// Non-blocking advisories produced by [`apply_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Status or assignment changed while the record has no reply.
    ChangedWithoutReply,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ChangedWithoutReply => {
                "Status or assignment changed without a reply or internal note"
            }
        }
    }
}

/// Apply a set of edits atomically: either every field is validated and
/// applied, or the record is left untouched. An edit naming no field is a
/// validation error.
pub fn apply_changes(
    suggestion: &mut Suggestion,
    changes: &SuggestionChanges,
    actor: &Actor,
    now: Timestamp,
) -> Result<Vec<Advisory>, CoreError> {
    require(actor, Capability::ManageSuggestions)?;
    if changes.is_empty() {
        return Err(CoreError::Validation(
            "At least one of status, priority, assigned_to or reply is required".into(),
        ));
    }

    let assigned_to = match &changes.assigned_to {
        Some(name) => Some(normalize_assignee(name)?),
        None => None,
    };
    let reply = match &changes.reply {
        Some(text) => Some(normalize_reply(text)?),
        None => None,
    };

    let status_changed = changes.status.is_some_and(|s| s != suggestion.status);
    let assignee_changed = assigned_to
        .as_ref()
        .is_some_and(|a| a.is_some() && *a != suggestion.assigned_to);

    if let Some(status) = changes.status {
        apply_status(suggestion, status, now);
    }
    if let Some(priority) = changes.priority {
        suggestion.priority = priority;
    }
    if let Some(assigned_to) = assigned_to {
        suggestion.assigned_to = assigned_to;
    }
    if let Some(reply) = reply {
        suggestion.reply = reply;
    }
    suggestion.updated_at = now;

    let mut advisories = Vec::new();
    if (status_changed || assignee_changed) && suggestion.reply.is_none() {
        advisories.push(Advisory::ChangedWithoutReply);
    }
    Ok(advisories)
}

fn apply_status(suggestion: &mut Suggestion, status: SuggestionStatus, now: Timestamp) {
    let was_resolved = suggestion.status == SuggestionStatus::Resolved;
    let now_resolved = status == SuggestionStatus::Resolved;
    if now_resolved && !was_resolved {
        suggestion.actual_resolution_date = Some(now);
    } else if !now_resolved {
        suggestion.actual_resolution_date = None;
    }
    suggestion.status = status;
}

fn normalize_assignee(name: &str) -> Result<Option<String>, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if char_len(name) > MAX_ASSIGNEE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Assignee name must not exceed {MAX_ASSIGNEE_LENGTH} characters"
        )));
    }
    Ok(Some(name.to_string()))
}

fn normalize_reply(text: &str) -> Result<Option<String>, CoreError> {
    let cleaned = clean_for_storage(text);
    if cleaned.is_empty() {
        return Ok(None);
    }
    if char_len(&cleaned) > MAX_REPLY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Reply must not exceed {MAX_REPLY_LENGTH} characters"
        )));
    }
    Ok(Some(cleaned))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::permissions::Permissions;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn editor() -> Actor {
        Actor {
            admin_id: 7,
            name: "Grace Hopper".into(),
            is_active: true,
            permissions: Permissions {
                view_suggestions: true,
                manage_suggestions: true,
                ..Permissions::default()
            },
        }
    }

    fn viewer() -> Actor {
        Actor {
            admin_id: 8,
            name: "Read Only".into(),
            is_active: true,
            permissions: Permissions::view_only(),
        }
    }

    fn sample() -> Suggestion {
        NewSuggestion::validate(
            &Taxonomy::default(),
            "Workplace",
            "Safety",
            "The stairwell lighting is broken",
        )
        .expect("valid submission")
        .into_suggestion(1, t0())
    }

    #[test]
    fn new_submission_is_pending_and_unassigned() {
        let s = sample();
        assert_eq!(s.status, SuggestionStatus::Pending);
        assert_eq!(s.priority, Priority::Medium);
        assert!(s.assigned_to.is_none());
        assert!(s.reply.is_none());
        assert!(s.actual_resolution_date.is_none());
        assert_eq!(s.created_at, s.updated_at);
    }

    #[test]
    fn submission_text_is_cleaned_before_length_check() {
        let tax = Taxonomy::default();
        let result = NewSuggestion::validate(&tax, "Workplace", "Safety", "<p>short</p>");
        assert_matches!(result, Err(CoreError::Validation(_)));

        let ok = NewSuggestion::validate(&tax, "Workplace", "Safety", "Fix &amp; repaint walls")
            .expect("valid submission");
        assert_eq!(ok.suggestion_text, "Fix & repaint walls");
    }

    #[test]
    fn submission_length_bounds_are_inclusive() {
        let tax = Taxonomy::default();
        let min = "a".repeat(MIN_SUGGESTION_LENGTH);
        let max = "b".repeat(MAX_SUGGESTION_LENGTH);
        assert!(NewSuggestion::validate(&tax, "Workplace", "Safety", &min).is_ok());
        assert!(NewSuggestion::validate(&tax, "Workplace", "Safety", &max).is_ok());
        let over = "c".repeat(MAX_SUGGESTION_LENGTH + 1);
        assert!(NewSuggestion::validate(&tax, "Workplace", "Safety", &over).is_err());
    }

    #[test]
    fn submission_rejects_missing_fields() {
        let tax = Taxonomy::default();
        assert!(NewSuggestion::validate(&tax, "", "Safety", "long enough text").is_err());
        assert!(NewSuggestion::validate(&tax, "Workplace", " ", "long enough text").is_err());
        assert!(NewSuggestion::validate(&tax, "Workplace", "Salary", "long enough text").is_err());
    }

    #[test]
    fn status_parsing_round_trips() {
        for status in ALL_STATUSES {
            assert_eq!(SuggestionStatus::from_str(status.as_str()).unwrap(), *status);
        }
        assert!(SuggestionStatus::from_str("pending").is_err());
        assert!(Priority::from_str("Urgent").is_err());
    }

    #[test]
    fn set_status_without_manage_capability_leaves_record_unchanged() {
        let mut s = sample();
        let before = s.clone();
        let result = set_status(&mut s, SuggestionStatus::Resolved, &viewer(), t0() + Duration::hours(1));
        assert_matches!(result, Err(CoreError::PermissionDenied(_)));
        assert_eq!(s, before);
    }

    #[test]
    fn set_status_refreshes_updated_at() {
        let mut s = sample();
        let later = t0() + Duration::hours(2);
        set_status(&mut s, SuggestionStatus::Reviewed, &editor(), later).unwrap();
        assert_eq!(s.status, SuggestionStatus::Reviewed);
        assert_eq!(s.updated_at, later);
    }

    #[test]
    fn any_status_can_reach_any_other() {
        for from in ALL_STATUSES {
            for to in ALL_STATUSES {
                let mut s = sample();
                s.status = *from;
                set_status(&mut s, *to, &editor(), t0()).unwrap();
                assert_eq!(s.status, *to);
            }
        }
    }

    #[test]
    fn resolving_twice_is_idempotent_apart_from_updated_at() {
        let mut s = sample();
        set_status(&mut s, SuggestionStatus::Resolved, &editor(), t0() + Duration::hours(1)).unwrap();
        let first = s.clone();
        set_status(&mut s, SuggestionStatus::Resolved, &editor(), t0() + Duration::hours(2)).unwrap();

        assert_eq!(s.status, first.status);
        assert_eq!(s.actual_resolution_date, first.actual_resolution_date);
        assert!(s.actual_resolution_date.is_some());
        assert!(s.updated_at > first.updated_at);
    }

    #[test]
    fn reopening_clears_resolution_date() {
        let mut s = sample();
        set_status(&mut s, SuggestionStatus::Resolved, &editor(), t0()).unwrap();
        set_status(&mut s, SuggestionStatus::Escalated, &editor(), t0()).unwrap();
        assert!(s.actual_resolution_date.is_none());
    }

    #[test]
    fn assign_accepts_free_text_and_empty_unassigns() {
        let mut s = sample();
        assign(&mut s, "  Someone Not In The System ", &editor(), t0()).unwrap();
        assert_eq!(s.assigned_to.as_deref(), Some("Someone Not In The System"));
        assign(&mut s, "", &editor(), t0()).unwrap();
        assert!(s.assigned_to.is_none());
        assert!(assign(&mut s, "x", &viewer(), t0()).is_err());
    }

    #[test]
    fn set_reply_cleans_text() {
        let mut s = sample();
        set_reply(&mut s, "<i>Ticket</i> &lt;123&gt; raised", &editor(), t0()).unwrap();
        assert_eq!(s.reply.as_deref(), Some("Ticket <123> raised"));
        assert_matches!(
            set_reply(&mut s, "nope", &viewer(), t0()),
            Err(CoreError::PermissionDenied(_))
        );
    }

    #[test]
    fn set_priority_requires_manage_capability() {
        let mut s = sample();
        assert!(set_priority(&mut s, Priority::Critical, &viewer(), t0()).is_err());
        set_priority(&mut s, Priority::Critical, &editor(), t0()).unwrap();
        assert_eq!(s.priority, Priority::Critical);
    }

    #[test]
    fn apply_changes_warns_when_status_changes_without_reply() {
        let mut s = sample();
        let changes = SuggestionChanges {
            status: Some(SuggestionStatus::Escalated),
            ..SuggestionChanges::default()
        };
        let advisories = apply_changes(&mut s, &changes, &editor(), t0()).unwrap();
        assert_eq!(advisories, vec![Advisory::ChangedWithoutReply]);
        assert_eq!(s.status, SuggestionStatus::Escalated);
    }

    #[test]
    fn apply_changes_does_not_warn_when_reply_supplied() {
        let mut s = sample();
        let changes = SuggestionChanges {
            status: Some(SuggestionStatus::Reviewed),
            assigned_to: Some("Grace Hopper".into()),
            reply: Some("Facilities notified".into()),
            ..SuggestionChanges::default()
        };
        let advisories = apply_changes(&mut s, &changes, &editor(), t0()).unwrap();
        assert!(advisories.is_empty());
        assert_eq!(s.assigned_to.as_deref(), Some("Grace Hopper"));
    }

    #[test]
    fn apply_changes_priority_only_does_not_warn() {
        let mut s = sample();
        let changes = SuggestionChanges {
            priority: Some(Priority::High),
            ..SuggestionChanges::default()
        };
        assert!(apply_changes(&mut s, &changes, &editor(), t0()).unwrap().is_empty());
    }

    #[test]
    fn apply_changes_is_all_or_nothing() {
        let mut s = sample();
        let before = s.clone();
        let changes = SuggestionChanges {
            status: Some(SuggestionStatus::Resolved),
            reply: Some("r".repeat(MAX_REPLY_LENGTH + 1)),
            ..SuggestionChanges::default()
        };
        assert!(apply_changes(&mut s, &changes, &editor(), t0()).is_err());
        assert_eq!(s, before);
    }

    #[test]
    fn apply_changes_rejects_an_empty_edit() {
        let mut s = sample();
        let before = s.clone();
        assert_matches!(
            apply_changes(&mut s, &SuggestionChanges::default(), &editor(), t0()),
            Err(CoreError::Validation(_))
        );
        assert_eq!(s, before);
    }

    #[test]
    fn changes_accept_camel_case_assignee_and_reject_unknown_fields() {
        let changes: SuggestionChanges =
            serde_json::from_str(r#"{"assignedTo": "Grace Hopper"}"#).unwrap();
        assert_eq!(changes.assigned_to.as_deref(), Some("Grace Hopper"));

        let unknown = serde_json::from_str::<SuggestionChanges>(r#"{"assignee": "Grace"}"#);
        assert!(unknown.is_err());
    }
}
