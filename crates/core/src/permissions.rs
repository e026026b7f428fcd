//! Admin capability model.
//!
//! An admin account holds a fixed set of independently toggleable
//! capabilities. Roles (see [`crate::admin::AdminRole`]) are descriptive
//! metadata only and never imply a capability.
//!
//! Every capability-gated operation calls [`require`] with the acting
//! [`Actor`] before touching any record.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// A single named permission flag on an admin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewAnalytics,
    ViewSuggestions,
    /// Edit, assign and reply to suggestions.
    ManageSuggestions,
    DeleteSuggestions,
    ManageAdmins,
    ExportData,
}

/// All capabilities, in display order.
pub const ALL_CAPABILITIES: &[Capability] = &[
    Capability::ViewAnalytics,
    Capability::ViewSuggestions,
    Capability::ManageSuggestions,
    Capability::DeleteSuggestions,
    Capability::ManageAdmins,
    Capability::ExportData,
];

impl Capability {
    /// Return the wire / column-suffix representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewAnalytics => "view_analytics",
            Self::ViewSuggestions => "view_suggestions",
            Self::ManageSuggestions => "manage_suggestions",
            Self::DeleteSuggestions => "delete_suggestions",
            Self::ManageAdmins => "manage_admins",
            Self::ExportData => "export_data",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Permission set
// ---------------------------------------------------------------------------

/// The closed set of capability flags held by one admin account.
///
/// Missing fields deserialize as `false`, so a partial JSON object grants
/// only what it names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub view_analytics: bool,
    pub view_suggestions: bool,
    pub manage_suggestions: bool,
    pub delete_suggestions: bool,
    pub manage_admins: bool,
    pub export_data: bool,
}

impl Permissions {
    /// Every capability granted. Used for the bootstrap account.
    pub fn all() -> Self {
        Self {
            view_analytics: true,
            view_suggestions: true,
            manage_suggestions: true,
            delete_suggestions: true,
            manage_admins: true,
            export_data: true,
        }
    }

    /// The grant pre-selected when creating an account without an explicit
    /// permission set: analytics and read-only suggestion access.
    pub fn view_only() -> Self {
        Self {
            view_analytics: true,
            view_suggestions: true,
            ..Self::default()
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::ViewAnalytics => self.view_analytics,
            Capability::ViewSuggestions => self.view_suggestions,
            Capability::ManageSuggestions => self.manage_suggestions,
            Capability::DeleteSuggestions => self.delete_suggestions,
            Capability::ManageAdmins => self.manage_admins,
            Capability::ExportData => self.export_data,
        }
    }

    /// Capabilities currently granted, in display order.
    pub fn granted(&self) -> Vec<Capability> {
        ALL_CAPABILITIES
            .iter()
            .copied()
            .filter(|c| self.has(*c))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Acting principal
// ---------------------------------------------------------------------------

/// The admin on whose behalf an operation runs.
///
/// Built fresh from the account record for every request; never cached
/// across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub admin_id: DbId,
    /// Display name (`"First Last"`).
    pub name: String,
    pub is_active: bool,
    pub permissions: Permissions,
}

/// Returns `true` iff the actor is active and holds `capability`.
pub fn authorize(actor: &Actor, capability: Capability) -> bool {
    actor.is_active && actor.permissions.has(capability)
}

/// Like [`authorize`], but fails with [`CoreError::PermissionDenied`].
pub fn require(actor: &Actor, capability: Capability) -> Result<(), CoreError> {
    if !actor.is_active {
        return Err(CoreError::PermissionDenied("Account is deactivated".into()));
    }
    if !actor.permissions.has(capability) {
        return Err(CoreError::PermissionDenied(format!(
            "Missing required permission: {capability}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn actor_with(permissions: Permissions) -> Actor {
        Actor {
            admin_id: 1,
            name: "Ada Lovelace".into(),
            is_active: true,
            permissions,
        }
    }

    #[test]
    fn each_flag_grants_only_its_capability() {
        for cap in ALL_CAPABILITIES {
            let mut perms = Permissions::default();
            match cap {
                Capability::ViewAnalytics => perms.view_analytics = true,
                Capability::ViewSuggestions => perms.view_suggestions = true,
                Capability::ManageSuggestions => perms.manage_suggestions = true,
                Capability::DeleteSuggestions => perms.delete_suggestions = true,
                Capability::ManageAdmins => perms.manage_admins = true,
                Capability::ExportData => perms.export_data = true,
            }
            let actor = actor_with(perms);
            for other in ALL_CAPABILITIES {
                assert_eq!(authorize(&actor, *other), other == cap, "{cap} vs {other}");
            }
        }
    }

    #[test]
    fn inactive_actor_is_denied_everything() {
        let mut actor = actor_with(Permissions::all());
        actor.is_active = false;
        for cap in ALL_CAPABILITIES {
            assert!(!authorize(&actor, *cap));
            assert_matches!(require(&actor, *cap), Err(CoreError::PermissionDenied(_)));
        }
    }

    #[test]
    fn require_names_missing_capability() {
        let actor = actor_with(Permissions::view_only());
        let err = require(&actor, Capability::ManageAdmins).unwrap_err();
        assert!(err.to_string().contains("manage_admins"));
        assert!(require(&actor, Capability::ViewSuggestions).is_ok());
    }

    #[test]
    fn partial_json_defaults_missing_flags_to_false() {
        let perms: Permissions =
            serde_json::from_str(r#"{"view_suggestions": true}"#).expect("valid json");
        assert_eq!(perms.granted(), vec![Capability::ViewSuggestions]);
    }

    #[test]
    fn all_grants_every_capability() {
        assert_eq!(Permissions::all().granted(), ALL_CAPABILITIES.to_vec());
        assert!(Permissions::default().granted().is_empty());
    }
}
