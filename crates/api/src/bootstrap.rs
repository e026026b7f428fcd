//! Startup helpers: taxonomy loading and first-run admin seeding.

use ghost_core::admin::{check_password_policy, normalize_email, AdminRole};
use ghost_core::permissions::Permissions;
use ghost_core::taxonomy::Taxonomy;
use ghost_core::types::DbId;
use ghost_db::models::admin::NewAdmin;
use ghost_db::Store;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Load the taxonomy from `path`, or fall back to the built-in one.
pub fn load_taxonomy(path: Option<&str>) -> AppResult<Taxonomy> {
    let Some(path) = path else {
        return Ok(Taxonomy::default());
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::InternalError(format!("Cannot read taxonomy file '{path}': {e}")))?;
    Ok(Taxonomy::from_json(&raw)?)
}

/// Seed one admin holding every capability if the store has no admins.
///
/// Returns the new account id, or `None` when admins already exist.
pub async fn seed_bootstrap_admin(
    store: &dyn Store,
    bootstrap: &BootstrapAdmin,
) -> AppResult<Option<DbId>> {
    if store.count_admins().await? > 0 {
        return Ok(None);
    }

    let email = normalize_email(&bootstrap.email)?;
    check_password_policy(&bootstrap.password)?;
    let password_hash = hash_password(&bootstrap.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = store
        .insert_admin(&NewAdmin {
            email,
            first_name: "System".into(),
            last_name: "Administrator".into(),
            role: AdminRole::Ceo,
            permissions: Permissions::all(),
            password_hash,
        })
        .await?;

    tracing::info!(admin_id = created.id, "Bootstrap admin created");
    Ok(Some(created.id))
}
