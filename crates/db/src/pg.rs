//! PostgreSQL backend: adapts the repositories to the store traits.

use async_trait::async_trait;
use ghost_core::query::{Page, PageInfo, PageRequest, SortSpec, SuggestionFilter};
use ghost_core::stats::CategoryStatusCount;
use ghost_core::suggestion::{NewSuggestion, Suggestion, SuggestionStatus};
use ghost_core::types::{DbId, Timestamp};

use crate::error::StoreError;
use crate::models::admin::{AdminAccount, AdminUpdate, NewAdmin};
use crate::models::suggestion::rows_into_suggestions;
use crate::repositories::{AdminRepo, SuggestionRepo};
use crate::store::{AdminStore, Store, SuggestionStore};
use crate::DbPool;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn parse_status(raw: &str) -> Result<SuggestionStatus, StoreError> {
    SuggestionStatus::from_str(raw).map_err(|e| StoreError::Corrupt(e.to_string()))
}

#[async_trait]
impl SuggestionStore for PgStore {
    async fn insert_suggestion(&self, new: &NewSuggestion) -> Result<Suggestion, StoreError> {
        SuggestionRepo::create(&self.pool, new).await?.try_into()
    }

    async fn find_suggestion(&self, id: DbId) -> Result<Option<Suggestion>, StoreError> {
        SuggestionRepo::find_by_id(&self.pool, id)
            .await?
            .map(Suggestion::try_from)
            .transpose()
    }

    async fn save_suggestion(
        &self,
        suggestion: &Suggestion,
    ) -> Result<Option<Suggestion>, StoreError> {
        SuggestionRepo::update(&self.pool, suggestion)
            .await?
            .map(Suggestion::try_from)
            .transpose()
    }

    async fn delete_suggestion(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(SuggestionRepo::delete(&self.pool, id).await?)
    }

    async fn query_suggestions(
        &self,
        filter: &SuggestionFilter,
        sort: SortSpec,
        page: PageRequest,
    ) -> Result<Page<Suggestion>, StoreError> {
        let total = SuggestionRepo::count(&self.pool, filter).await?;
        let rows = SuggestionRepo::query(&self.pool, filter, sort, page).await?;
        Ok(Page {
            items: rows_into_suggestions(rows)?,
            pagination: PageInfo::new(page, total.max(0) as u64),
        })
    }

    async fn list_suggestions(
        &self,
        filter: &SuggestionFilter,
        sort: SortSpec,
    ) -> Result<Vec<Suggestion>, StoreError> {
        rows_into_suggestions(SuggestionRepo::list(&self.pool, filter, sort).await?)
    }

    async fn count_by_status(&self) -> Result<Vec<(SuggestionStatus, u64)>, StoreError> {
        SuggestionRepo::count_by_status(&self.pool)
            .await?
            .into_iter()
            .map(|(status, count)| Ok((parse_status(&status)?, count.max(0) as u64)))
            .collect()
    }

    async fn count_by_category_status(&self) -> Result<Vec<CategoryStatusCount>, StoreError> {
        SuggestionRepo::count_by_category_status(&self.pool)
            .await?
            .into_iter()
            .map(|(category, status, count)| {
                Ok(CategoryStatusCount {
                    category,
                    status: parse_status(&status)?,
                    count: count.max(0) as u64,
                })
            })
            .collect()
    }
}

#[async_trait]
impl AdminStore for PgStore {
    async fn insert_admin(&self, new: &NewAdmin) -> Result<AdminAccount, StoreError> {
        AdminRepo::create(&self.pool, new).await?.try_into()
    }

    async fn find_admin(&self, id: DbId) -> Result<Option<AdminAccount>, StoreError> {
        AdminRepo::find_by_id(&self.pool, id)
            .await?
            .map(AdminAccount::try_from)
            .transpose()
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        AdminRepo::find_by_email(&self.pool, email)
            .await?
            .map(AdminAccount::try_from)
            .transpose()
    }

    async fn list_admins(&self) -> Result<Vec<AdminAccount>, StoreError> {
        AdminRepo::list(&self.pool)
            .await?
            .into_iter()
            .map(AdminAccount::try_from)
            .collect()
    }

    async fn count_admins(&self) -> Result<u64, StoreError> {
        Ok(AdminRepo::count(&self.pool).await?.max(0) as u64)
    }

    async fn update_admin(
        &self,
        id: DbId,
        update: &AdminUpdate,
    ) -> Result<Option<AdminAccount>, StoreError> {
        AdminRepo::update(&self.pool, id, update)
            .await?
            .map(AdminAccount::try_from)
            .transpose()
    }

    async fn set_admin_active(&self, id: DbId, active: bool) -> Result<bool, StoreError> {
        Ok(AdminRepo::set_active(&self.pool, id, active).await?)
    }

    async fn record_login(&self, id: DbId, at: Timestamp) -> Result<(), StoreError> {
        Ok(AdminRepo::record_login(&self.pool, id, at).await?)
    }

    async fn update_admin_password(
        &self,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        Ok(AdminRepo::update_password(&self.pool, id, password_hash).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
