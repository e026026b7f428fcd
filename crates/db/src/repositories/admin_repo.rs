//! Repository for the `admins` table.

use ghost_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::admin::{AdminRow, AdminUpdate, NewAdmin};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, first_name, last_name, role, password_hash, \
                       view_analytics, view_suggestions, manage_suggestions, \
                       delete_suggestions, manage_admins, export_data, \
                       is_active, last_login, created_at, updated_at";

/// Provides CRUD operations for admin accounts. Accounts are never deleted.
pub struct AdminRepo;

impl AdminRepo {
    /// Insert a new admin, returning the created row.
    ///
    /// A duplicate email violates `uq_admins_email`.
    pub async fn create(pool: &PgPool, input: &NewAdmin) -> Result<AdminRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO admins (email, first_name, last_name, role, password_hash,
                view_analytics, view_suggestions, manage_suggestions,
                delete_suggestions, manage_admins, export_data)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let p = &input.permissions;
        sqlx::query_as::<_, AdminRow>(&query)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.role.as_str())
            .bind(&input.password_hash)
            .bind(p.view_analytics)
            .bind(p.view_suggestions)
            .bind(p.manage_suggestions)
            .bind(p.delete_suggestions)
            .bind(p.manage_admins)
            .bind(p.export_data)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AdminRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE id = $1");
        sqlx::query_as::<_, AdminRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an admin by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AdminRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, AdminRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all admins ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<AdminRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins ORDER BY first_name, last_name, id");
        sqlx::query_as::<_, AdminRow>(&query).fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM admins")
            .fetch_one(pool)
            .await
    }

    /// Update an admin. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &AdminUpdate,
    ) -> Result<Option<AdminRow>, sqlx::Error> {
        let query = format!(
            "UPDATE admins SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                role = COALESCE($5, role),
                password_hash = COALESCE($6, password_hash),
                view_analytics = COALESCE($7, view_analytics),
                view_suggestions = COALESCE($8, view_suggestions),
                manage_suggestions = COALESCE($9, manage_suggestions),
                delete_suggestions = COALESCE($10, delete_suggestions),
                manage_admins = COALESCE($11, manage_admins),
                export_data = COALESCE($12, export_data),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let p = input.permissions;
        sqlx::query_as::<_, AdminRow>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.role.map(|r| r.as_str()))
            .bind(&input.password_hash)
            .bind(p.map(|p| p.view_analytics))
            .bind(p.map(|p| p.view_suggestions))
            .bind(p.map(|p| p.manage_suggestions))
            .bind(p.map(|p| p.delete_suggestions))
            .bind(p.map(|p| p.manage_admins))
            .bind(p.map(|p| p.export_data))
            .fetch_optional(pool)
            .await
    }

    /// Set `is_active`. Returns `true` if the row exists.
    pub async fn set_active(pool: &PgPool, id: DbId, active: bool) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE admins SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(active)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login.
    pub async fn record_login(pool: &PgPool, id: DbId, at: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE admins SET last_login = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Update an admin's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admins SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
