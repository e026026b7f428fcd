//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ghost_core::error::CoreError;
use ghost_core::permissions::Actor;
use ghost_db::models::admin::AdminAccount;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated admin extracted from a JWT Bearer token in the `Authorization` header.
///
/// The token only identifies the account. The account itself is reloaded
/// from the store on every request, so deactivation and permission changes
/// take effect on the next call.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(admin_id = user.account.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The account as currently stored.
    pub account: AdminAccount,
}

impl AuthUser {
    /// Acting principal for core operations.
    pub fn actor(&self) -> Actor {
        self.account.actor()
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let account = match state.store.find_admin(claims.sub).await? {
            Some(account) if account.is_active => account,
            _ => {
                tracing::warn!(admin_id = claims.sub, "Token presented for missing or inactive account");
                return Err(AppError::Core(CoreError::Unauthorized(
                    "Account not found or deactivated".into(),
                )));
            }
        };

        Ok(AuthUser { account })
    }
}
