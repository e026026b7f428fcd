//! In-memory backend.
//!
//! Used by the test suites and by the server when `DATABASE_URL` is unset.
//! Filter, sort and pagination delegate to [`ghost_core::query`], which the
//! SQL repositories mirror. Email uniqueness is enforced here the way the
//! `uq_admins_email` index enforces it in PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use ghost_core::query::{self, Page, PageRequest, SortSpec, SuggestionFilter};
use ghost_core::stats::CategoryStatusCount;
use ghost_core::suggestion::{NewSuggestion, Suggestion, SuggestionStatus};
use ghost_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::admin::{AdminAccount, AdminUpdate, NewAdmin};
use crate::store::{AdminStore, Store, SuggestionStore};

#[derive(Default)]
struct Tables {
    suggestions: Vec<Suggestion>,
    admins: Vec<AdminAccount>,
    last_suggestion_id: DbId,
    last_admin_id: DbId,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed suggestion, keeping its timestamps.
    ///
    /// Lets callers seed historical data; the id is reassigned.
    pub async fn seed_suggestion(&self, mut suggestion: Suggestion) -> Suggestion {
        let mut tables = self.tables.write().await;
        tables.last_suggestion_id += 1;
        suggestion.id = tables.last_suggestion_id;
        tables.suggestions.push(suggestion.clone());
        suggestion
    }
}

fn email_conflict(email: &str) -> StoreError {
    StoreError::Conflict(format!("An admin with email '{email}' already exists"))
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn insert_suggestion(&self, new: &NewSuggestion) -> Result<Suggestion, StoreError> {
        let mut tables = self.tables.write().await;
        tables.last_suggestion_id += 1;
        let suggestion = new.clone().into_suggestion(tables.last_suggestion_id, Utc::now());
        tables.suggestions.push(suggestion.clone());
        Ok(suggestion)
    }

    async fn find_suggestion(&self, id: DbId) -> Result<Option<Suggestion>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.suggestions.iter().find(|s| s.id == id).cloned())
    }

    async fn save_suggestion(
        &self,
        suggestion: &Suggestion,
    ) -> Result<Option<Suggestion>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.suggestions.iter_mut().find(|s| s.id == suggestion.id) else {
            return Ok(None);
        };
        stored.status = suggestion.status;
        stored.priority = suggestion.priority;
        stored.assigned_to = suggestion.assigned_to.clone();
        stored.reply = suggestion.reply.clone();
        stored.actual_resolution_date = suggestion.actual_resolution_date;
        stored.updated_at = suggestion.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn delete_suggestion(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.suggestions.len();
        tables.suggestions.retain(|s| s.id != id);
        Ok(tables.suggestions.len() < before)
    }

    async fn query_suggestions(
        &self,
        filter: &SuggestionFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<Page<Suggestion>, StoreError> {
        let tables = self.tables.read().await;
        Ok(query::paginate(&tables.suggestions, filter, sort, page))
    }

    async fn list_suggestions(
        &self,
        filter: &SuggestionFilter,
        sort: SortSpec,
    ) -> Result<Vec<Suggestion>, StoreError> {
        let tables = self.tables.read().await;
        Ok(query::filter_sorted(&tables.suggestions, filter, sort))
    }

    async fn count_by_status(&self) -> Result<Vec<(SuggestionStatus, u64)>, StoreError> {
        let tables = self.tables.read().await;
        let mut counts: Vec<(SuggestionStatus, u64)> = Vec::new();
        for s in &tables.suggestions {
            match counts.iter_mut().find(|(status, _)| *status == s.status) {
                Some((_, n)) => *n += 1,
                None => counts.push((s.status, 1)),
            }
        }
        Ok(counts)
    }

    async fn count_by_category_status(&self) -> Result<Vec<CategoryStatusCount>, StoreError> {
        let tables = self.tables.read().await;
        let mut counts: Vec<CategoryStatusCount> = Vec::new();
        for s in &tables.suggestions {
            match counts
                .iter_mut()
                .find(|c| c.category == s.category && c.status == s.status)
            {
                Some(c) => c.count += 1,
                None => counts.push(CategoryStatusCount {
                    category: s.category.clone(),
                    status: s.status,
                    count: 1,
                }),
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn insert_admin(&self, new: &NewAdmin) -> Result<AdminAccount, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.admins.iter().any(|a| a.email.eq_ignore_ascii_case(&new.email)) {
            return Err(email_conflict(&new.email));
        }
        tables.last_admin_id += 1;
        let now = Utc::now();
        let account = AdminAccount {
            id: tables.last_admin_id,
            email: new.email.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            role: new.role,
            permissions: new.permissions,
            is_active: true,
            last_login: None,
            password_hash: new.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.admins.push(account.clone());
        Ok(account)
    }

    async fn find_admin(&self, id: DbId) -> Result<Option<AdminAccount>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.admins.iter().find(|a| a.id == id).cloned())
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .admins
            .iter()
            .find(|a| a.email.to_lowercase() == email.to_lowercase())
            .cloned())
    }

    async fn list_admins(&self) -> Result<Vec<AdminAccount>, StoreError> {
        let tables = self.tables.read().await;
        let mut admins = tables.admins.clone();
        admins.sort_by(|a, b| {
            (&a.first_name, &a.last_name, a.id).cmp(&(&b.first_name, &b.last_name, b.id))
        });
        Ok(admins)
    }

    async fn count_admins(&self) -> Result<u64, StoreError> {
        Ok(self.tables.read().await.admins.len() as u64)
    }

    async fn update_admin(
        &self,
        id: DbId,
        update: &AdminUpdate,
    ) -> Result<Option<AdminAccount>, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(email) = &update.email {
            let taken = tables
                .admins
                .iter()
                .any(|a| a.id != id && a.email.eq_ignore_ascii_case(email));
            if taken {
                return Err(email_conflict(email));
            }
        }
        let Some(account) = tables.admins.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        update.apply_to(account, Utc::now());
        Ok(Some(account.clone()))
    }

    async fn set_admin_active(&self, id: DbId, active: bool) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.admins.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.is_active = active;
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_login(&self, id: DbId, at: Timestamp) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(account) = tables.admins.iter_mut().find(|a| a.id == id) {
            account.last_login = Some(at);
        }
        Ok(())
    }

    async fn update_admin_password(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        match tables.admins.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                account.password_hash = password_hash.to_string();
                account.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
