//! Handlers for the `/admin/admins` resource (admin account management).
//!
//! Reads are open to any authenticated admin. Mutations require
//! `manage_admins`, and the same check runs again inside
//! [`ghost_core::admin`] on the actor passed down.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ghost_core::admin::{check_deactivate, validate_create, validate_update, CreateAdmin, UpdateAdmin};
use ghost_core::error::CoreError;
use ghost_core::types::DbId;
use ghost_db::models::admin::{AdminName, AdminResponse, AdminUpdate, NewAdmin};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManageAdmins;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/admins
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AdminResponse>>>> {
    let admins = state.store.list_admins().await?;
    Ok(Json(DataResponse {
        data: admins.iter().map(AdminResponse::from).collect(),
    }))
}

/// GET /api/v1/admin/admins/names
///
/// Reduced projection of active accounts for assignment lookups.
pub async fn names(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<AdminName>>>> {
    let admins = state.store.list_admins().await?;
    Ok(Json(DataResponse {
        data: admins
            .iter()
            .filter(|a| a.is_active)
            .map(AdminName::from)
            .collect(),
    }))
}

/// GET /api/v1/admin/admins/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdminResponse>>> {
    let admin = state
        .store
        .find_admin(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: AdminResponse::from(&admin),
    }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/admins
pub async fn create(
    State(state): State<AppState>,
    RequireManageAdmins(user): RequireManageAdmins,
    Json(input): Json<CreateAdmin>,
) -> AppResult<(StatusCode, Json<DataResponse<AdminResponse>>)> {
    let valid = validate_create(&user.actor(), &input)?;

    if state.store.find_admin_by_email(&valid.email).await?.is_some() {
        return Err(duplicate_email());
    }

    let password_hash = hash_password(&valid.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let created = state
        .store
        .insert_admin(&NewAdmin {
            email: valid.email,
            first_name: valid.first_name,
            last_name: valid.last_name,
            role: valid.role,
            permissions: valid.permissions,
            password_hash,
        })
        .await?;

    tracing::info!(
        admin_id = user.account.id,
        target_admin_id = created.id,
        role = created.role.as_str(),
        "Admin account created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: AdminResponse::from(&created),
        }),
    ))
}

/// PUT /api/v1/admin/admins/{id}
///
/// Omitted fields are left unchanged; an empty password means "no change".
pub async fn update(
    State(state): State<AppState>,
    RequireManageAdmins(user): RequireManageAdmins,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAdmin>,
) -> AppResult<Json<DataResponse<AdminResponse>>> {
    let valid = validate_update(&user.actor(), &input)?;

    if let Some(email) = &valid.email {
        let taken = state.store.find_admin_by_email(email).await?;
        if taken.is_some_and(|other| other.id != id) {
            return Err(duplicate_email());
        }
    }

    let password_hash = valid
        .password
        .as_deref()
        .map(hash_password)
        .transpose()
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let update = AdminUpdate {
        email: valid.email,
        first_name: valid.first_name,
        last_name: valid.last_name,
        role: valid.role,
        permissions: valid.permissions,
        password_hash,
    };
    let updated = state
        .store
        .update_admin(id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        admin_id = user.account.id,
        target_admin_id = id,
        password_changed = update.password_hash.is_some(),
        "Admin account updated",
    );

    Ok(Json(DataResponse {
        data: AdminResponse::from(&updated),
    }))
}

/// DELETE /api/v1/admin/admins/{id}
///
/// Deactivates the account (soft delete). Returns 204 No Content.
pub async fn deactivate(
    State(state): State<AppState>,
    RequireManageAdmins(user): RequireManageAdmins,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    check_deactivate(&user.actor(), id)?;

    if !state.store.set_admin_active(id, false).await? {
        return Err(not_found(id));
    }

    tracing::info!(admin_id = user.account.id, target_admin_id = id, "Admin account deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Admin", id })
}

fn duplicate_email() -> AppError {
    AppError::Core(CoreError::Conflict(
        "An admin with this email already exists".into(),
    ))
}
