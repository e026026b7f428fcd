//! Capability-based access control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects the request with 403
//! `PERMISSION_DENIED` unless the account holds one named capability. Roles
//! play no part here. Core operations repeat the same check on the actor
//! they are handed, so these extractors only fail earlier, never differently.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use ghost_core::permissions::{require, Capability};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

async fn require_capability(
    parts: &mut Parts,
    state: &AppState,
    capability: Capability,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if let Err(err) = require(&user.actor(), capability) {
        tracing::warn!(
            admin_id = user.account.id,
            capability = %capability,
            path = %parts.uri.path(),
            "Permission denied",
        );
        return Err(err.into());
    }
    Ok(user)
}

macro_rules! capability_extractor {
    ($(#[$doc:meta])* $name:ident => $capability:expr) => {
        $(#[$doc])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                require_capability(parts, state, $capability).await.map($name)
            }
        }
    };
}

capability_extractor!(
    /// Requires `view_analytics`.
    RequireViewAnalytics => Capability::ViewAnalytics
);
capability_extractor!(
    /// Requires `view_suggestions`.
    ///
    /// ```ignore
    /// async fn list(RequireViewSuggestions(user): RequireViewSuggestions) -> AppResult<Json<()>> {
    ///     Ok(Json(()))
    /// }
    /// ```
    RequireViewSuggestions => Capability::ViewSuggestions
);
capability_extractor!(
    /// Requires `manage_suggestions` (edit, assign, reply).
    RequireManageSuggestions => Capability::ManageSuggestions
);
capability_extractor!(
    /// Requires `delete_suggestions`.
    RequireDeleteSuggestions => Capability::DeleteSuggestions
);
capability_extractor!(
    /// Requires `manage_admins`.
    RequireManageAdmins => Capability::ManageAdmins
);
capability_extractor!(
    /// Requires `export_data`.
    RequireExportData => Capability::ExportData
);
