//! Handlers for the `/auth` resource (login, verify, refresh, change-password).

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use ghost_core::admin::{check_password_policy, normalize_email};
use ghost_core::error::CoreError;
use ghost_db::models::admin::{AdminAccount, AdminResponse};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, validate_token};
use crate::auth::password::{dummy_hash, hash_password, verify_password};
use crate::auth::session::TokenGrant;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Message shared by every login failure so callers cannot tell which accounts exist.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminResponse>,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Unknown email, wrong password and
/// deactivated account all yield the same 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenGrant>> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let email = normalize_email(&input.email).map_err(|_| invalid())?;
    let found = state.store.find_admin_by_email(&email).await?;

    let checked = check_credentials(&input.password, found, dummy_hash(), verify_password)?;
    let Some(mut account) = checked else {
        return Err(invalid());
    };

    let now = Utc::now();
    state.store.record_login(account.id, now).await?;
    account.last_login = Some(now);

    tracing::info!(admin_id = account.id, "Admin logged in");
    Ok(Json(issue_grant(&state, &account)?))
}

/// POST /api/v1/auth/verify
///
/// Report whether a token is currently usable. Never fails on a bad token.
pub async fn verify(
    State(state): State<AppState>,
    Json(input): Json<VerifyRequest>,
) -> AppResult<Json<VerifyResponse>> {
    let Ok(claims) = validate_token(&input.token, &state.config.jwt) else {
        return Ok(Json(VerifyResponse {
            valid: false,
            admin: None,
        }));
    };

    let admin = state
        .store
        .find_admin(claims.sub)
        .await?
        .filter(|a| a.is_active)
        .map(|a| AdminResponse::from(&a));

    Ok(Json(VerifyResponse {
        valid: admin.is_some(),
        admin,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid token for a fresh one carrying the current account state.
pub async fn refresh(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<TokenGrant>> {
    tracing::debug!(admin_id = user.account.id, "Token refreshed");
    Ok(Json(issue_grant(&state, &user.account)?))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let current_valid = verify_password(&input.current_password, &user.account.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !current_valid {
        return Err(AppError::Core(CoreError::Validation(
            "Current password is incorrect".into(),
        )));
    }

    check_password_policy(&input.new_password)?;

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let updated = state
        .store
        .update_admin_password(user.account.id, &new_hash)
        .await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Admin",
            id: user.account.id,
        }));
    }

    tracing::info!(admin_id = user.account.id, "Password changed");
    Ok(Json(MessageResponse {
        message: "Password changed successfully",
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve a login attempt to the account it authenticates, if any.
///
/// Exactly one password verification runs whatever the lookup returned:
/// against `dummy_hash` when no account matched, and against the stored hash
/// for an inactive account, so response time does not reveal which emails
/// have accounts.
fn check_credentials<F>(
    password: &str,
    account: Option<AdminAccount>,
    dummy_hash: &str,
    verify: F,
) -> AppResult<Option<AdminAccount>>
where
    F: Fn(&str, &str) -> Result<bool, argon2::password_hash::Error>,
{
    let hash = account.as_ref().map_or(dummy_hash, |a| a.password_hash.as_str());
    let matched = verify(password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    match account {
        Some(account) if !account.is_active => {
            tracing::warn!(admin_id = account.id, "Login attempt on deactivated account");
            Ok(None)
        }
        Some(account) if !matched => {
            tracing::warn!(admin_id = account.id, "Failed login");
            Ok(None)
        }
        Some(account) => Ok(Some(account)),
        None => Ok(None),
    }
}

fn issue_grant(state: &AppState, account: &AdminAccount) -> AppResult<TokenGrant> {
    let token = generate_access_token(account.id, account.role.as_str(), &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(TokenGrant {
        token,
        expires_in: state.config.jwt.expires_in_secs(),
        refresh_after: state.config.jwt.refresh_after_secs(),
        admin: AdminResponse::from(account),
    })
}
