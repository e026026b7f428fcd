//! Persistence traits.
//!
//! Services depend on `&dyn Store` rather than a concrete pool so the same
//! code runs against PostgreSQL ([`crate::pg::PgStore`]) and the in-memory
//! backend ([`crate::memory::MemoryStore`]). Both backends must agree on
//! filter, sort and pagination semantics; the reference semantics are
//! [`ghost_core::query`].

use async_trait::async_trait;
use ghost_core::query::{Page, PageRequest, SortSpec, SuggestionFilter};
use ghost_core::stats::CategoryStatusCount;
use ghost_core::suggestion::{NewSuggestion, Suggestion, SuggestionStatus};
use ghost_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::admin::{AdminAccount, AdminUpdate, NewAdmin};

#[async_trait]
pub trait SuggestionStore: Send + Sync {
    /// Insert a validated submission. The store assigns id and timestamps.
    async fn insert_suggestion(&self, new: &NewSuggestion) -> Result<Suggestion, StoreError>;

    async fn find_suggestion(&self, id: DbId) -> Result<Option<Suggestion>, StoreError>;

    /// Persist the mutable fields of `suggestion` (last write wins).
    ///
    /// Returns `None` if the row no longer exists.
    async fn save_suggestion(&self, suggestion: &Suggestion)
        -> Result<Option<Suggestion>, StoreError>;

    /// Hard delete. Returns `true` if a row was removed.
    async fn delete_suggestion(&self, id: DbId) -> Result<bool, StoreError>;

    async fn query_suggestions(
        &self,
        filter: &SuggestionFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<Page<Suggestion>, StoreError>;

    /// Every match for `filter`, unpaginated. Used by exports.
    async fn list_suggestions(
        &self,
        filter: &SuggestionFilter,
        sort: SortSpec,
    ) -> Result<Vec<Suggestion>, StoreError>;

    async fn count_by_status(&self) -> Result<Vec<(SuggestionStatus, u64)>, StoreError>;

    async fn count_by_category_status(&self) -> Result<Vec<CategoryStatusCount>, StoreError>;
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn insert_admin(&self, new: &NewAdmin) -> Result<AdminAccount, StoreError>;

    async fn find_admin(&self, id: DbId) -> Result<Option<AdminAccount>, StoreError>;

    /// Case-insensitive lookup.
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError>;

    /// All accounts, active and inactive, ordered by name.
    async fn list_admins(&self) -> Result<Vec<AdminAccount>, StoreError>;

    async fn count_admins(&self) -> Result<u64, StoreError>;

    /// Returns `None` if no account with `id` exists.
    async fn update_admin(
        &self,
        id: DbId,
        update: &AdminUpdate,
    ) -> Result<Option<AdminAccount>, StoreError>;

    /// Returns `true` if the row was found.
    async fn set_admin_active(&self, id: DbId, active: bool) -> Result<bool, StoreError>;

    async fn record_login(&self, id: DbId, at: Timestamp) -> Result<(), StoreError>;

    /// Returns `true` if the row was updated.
    async fn update_admin_password(&self, id: DbId, password_hash: &str)
        -> Result<bool, StoreError>;
}

/// A complete backend.
#[async_trait]
pub trait Store: SuggestionStore + AdminStore {
    /// Cheap liveness check.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}
