//! Admin account entity, row mapping, and DTOs.

use ghost_core::admin::{display_name, AdminRole};
use ghost_core::permissions::{Actor, Permissions};
use ghost_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::StoreError;

/// Full admin account as held by the store.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`AdminResponse`] for external-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub id: DbId,
    /// Always stored lower-cased.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AdminRole,
    pub permissions: Permissions,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AdminAccount {
    pub fn name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }

    /// Snapshot of this account as the acting principal of one request.
    pub fn actor(&self) -> Actor {
        Actor {
            admin_id: self.id,
            name: self.name(),
            is_active: self.is_active,
            permissions: self.permissions,
        }
    }
}

/// Safe admin representation for API responses (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminResponse {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub role: AdminRole,
    pub permissions: Permissions,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&AdminAccount> for AdminResponse {
    fn from(a: &AdminAccount) -> Self {
        Self {
            id: a.id,
            email: a.email.clone(),
            first_name: a.first_name.clone(),
            last_name: a.last_name.clone(),
            name: a.name(),
            role: a.role,
            permissions: a.permissions,
            is_active: a.is_active,
            last_login: a.last_login,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Reduced projection used for assignment lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminName {
    pub id: DbId,
    pub name: String,
    pub role: AdminRole,
    pub email: String,
}

impl From<&AdminAccount> for AdminName {
    fn from(a: &AdminAccount) -> Self {
        Self {
            id: a.id,
            name: a.name(),
            role: a.role,
            email: a.email.clone(),
        }
    }
}

/// DTO for inserting a validated admin account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AdminRole,
    pub permissions: Permissions,
    pub password_hash: String,
}

/// DTO for updating an admin account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AdminUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<AdminRole>,
    pub permissions: Option<Permissions>,
    pub password_hash: Option<String>,
}

impl AdminUpdate {
    /// Apply the update to an in-memory account.
    pub fn apply_to(&self, account: &mut AdminAccount, now: Timestamp) {
        if let Some(email) = &self.email {
            account.email = email.clone();
        }
        if let Some(first) = &self.first_name {
            account.first_name = first.clone();
        }
        if let Some(last) = &self.last_name {
            account.last_name = last.clone();
        }
        if let Some(role) = self.role {
            account.role = role;
        }
        if let Some(perms) = self.permissions {
            account.permissions = perms;
        }
        if let Some(hash) = &self.password_hash {
            account.password_hash = hash.clone();
        }
        account.updated_at = now;
    }
}

/// Raw row from the `admins` table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminRow {
    pub id: DbId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub password_hash: String,
    pub view_analytics: bool,
    pub view_suggestions: bool,
    pub manage_suggestions: bool,
    pub delete_suggestions: bool,
    pub manage_admins: bool,
    pub export_data: bool,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<AdminRow> for AdminAccount {
    type Error = StoreError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let role = AdminRole::from_str(&row.role)
            .map_err(|e| StoreError::Corrupt(format!("admins.id={}: {e}", row.id)))?;
        Ok(Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            role,
            permissions: Permissions {
                view_analytics: row.view_analytics,
                view_suggestions: row.view_suggestions,
                manage_suggestions: row.manage_suggestions,
                delete_suggestions: row.delete_suggestions,
                manage_admins: row.manage_admins,
                export_data: row.export_data,
            },
            is_active: row.is_active,
            last_login: row.last_login,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
