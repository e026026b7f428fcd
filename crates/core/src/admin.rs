//! Admin account manager: roles, profile-field validation, and the
//! capability-gated create/update/deactivate checks.
//!
//! Role is descriptive metadata only. It is stored next to the capability
//! flags in [`crate::permissions::Permissions`] and never implies any of them.
//! Every mutating check here calls [`require`] with
//! [`Capability::ManageAdmins`] before validating anything else.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::permissions::{require, Actor, Capability, Permissions};
use crate::text::char_len;
use crate::types::DbId;

/// Maximum length for first and last names.
pub const MAX_NAME_LENGTH: usize = 50;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

pub const ROLE_CEO: &str = "CEO";
pub const ROLE_CTO: &str = "CTO";
pub const ROLE_CFO: &str = "CFO";
pub const ROLE_COO: &str = "COO";
pub const ROLE_CCO: &str = "CCO";
pub const ROLE_CPO: &str = "CPO";
pub const ROLE_HR: &str = "HR";

pub const VALID_ROLES: &[&str] = &[
    ROLE_CEO, ROLE_CTO, ROLE_CFO, ROLE_COO, ROLE_CCO, ROLE_CPO, ROLE_HR,
];

/// Job title of an admin account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdminRole {
    #[serde(rename = "CEO")]
    Ceo,
    #[serde(rename = "CTO")]
    Cto,
    #[serde(rename = "CFO")]
    Cfo,
    #[serde(rename = "COO")]
    Coo,
    #[serde(rename = "CCO")]
    Cco,
    #[serde(rename = "CPO")]
    Cpo,
    /// Pre-selected in the account form. Not an enforced ceiling.
    #[default]
    #[serde(rename = "HR")]
    Hr,
}

impl AdminRole {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ceo => ROLE_CEO,
            Self::Cto => ROLE_CTO,
            Self::Cfo => ROLE_CFO,
            Self::Coo => ROLE_COO,
            Self::Cco => ROLE_CCO,
            Self::Cpo => ROLE_CPO,
            Self::Hr => ROLE_HR,
        }
    }

    /// Parse from a string, returning an error for unknown roles.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_CEO => Ok(Self::Ceo),
            ROLE_CTO => Ok(Self::Cto),
            ROLE_CFO => Ok(Self::Cfo),
            ROLE_COO => Ok(Self::Coo),
            ROLE_CCO => Ok(Self::Cco),
            ROLE_CPO => Ok(Self::Cpo),
            ROLE_HR => Ok(Self::Hr),
            other => Err(CoreError::Validation(format!(
                "Unknown role: '{other}'. Valid roles: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Trim, lower-case, and validate an email address.
///
/// Emails are unique case-insensitively, so the normalised form is what
/// gets stored and looked up.
pub fn normalize_email(email: &str) -> Result<String, CoreError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(CoreError::Validation("Email is required".into()));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!("Invalid email address '{email}'")));
    }
    Ok(email)
}

/// Trim and validate a first or last name.
pub fn normalize_name(field: &str, value: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    if char_len(value) > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} must not exceed {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(value.to_string())
}

/// Display name used for assignment lookups.
pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}")
}

/// Minimum password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Check the password strength policy.
///
/// At least [`MIN_PASSWORD_LENGTH`] characters, with at least one upper-case
/// letter, one lower-case letter, one digit, and one symbol. The error names
/// the first unmet rule.
pub fn check_password_policy(password: &str) -> Result<(), CoreError> {
    let rule = if char_len(password) < MIN_PASSWORD_LENGTH {
        Some(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ))
    } else if !password.chars().any(char::is_uppercase) {
        Some("Password must contain an upper-case letter".to_string())
    } else if !password.chars().any(char::is_lowercase) {
        Some("Password must contain a lower-case letter".to_string())
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain a digit".to_string())
    } else if !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        Some("Password must contain a symbol".to_string())
    } else {
        None
    };
    match rule {
        Some(msg) => Err(CoreError::Validation(msg)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Account management
// ---------------------------------------------------------------------------

/// Request to create an admin account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Defaults to [`AdminRole::Hr`].
    pub role: Option<AdminRole>,
    /// Defaults to [`Permissions::view_only`].
    pub permissions: Option<Permissions>,
    pub password: String,
}

/// Request to update an admin account. `None` leaves a field unchanged and
/// an empty `password` means "no change".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAdmin {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<AdminRole>,
    pub permissions: Option<Permissions>,
    pub password: Option<String>,
}

/// A create request that passed every check. The password is still
/// plaintext and must be hashed before storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAdmin {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AdminRole,
    pub permissions: Permissions,
    pub password: String,
}

/// An update request that passed every check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedAdminUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<AdminRole>,
    pub permissions: Option<Permissions>,
    /// New plaintext password, if one was supplied.
    pub password: Option<String>,
}

/// Validate a create request on behalf of `actor`.
///
/// Email uniqueness is the store's concern and is not checked here.
pub fn validate_create(actor: &Actor, input: &CreateAdmin) -> Result<ValidatedAdmin, CoreError> {
    require(actor, Capability::ManageAdmins)?;
    let email = normalize_email(&input.email)?;
    let first_name = normalize_name("First name", &input.first_name)?;
    let last_name = normalize_name("Last name", &input.last_name)?;
    check_password_policy(&input.password)?;
    Ok(ValidatedAdmin {
        email,
        first_name,
        last_name,
        role: input.role.unwrap_or_default(),
        permissions: input.permissions.unwrap_or_else(Permissions::view_only),
        password: input.password.clone(),
    })
}

/// Validate an update request on behalf of `actor`.
pub fn validate_update(
    actor: &Actor,
    input: &UpdateAdmin,
) -> Result<ValidatedAdminUpdate, CoreError> {
    require(actor, Capability::ManageAdmins)?;
    let password = match input.password.as_deref() {
        None | Some("") => None,
        Some(p) => {
            check_password_policy(p)?;
            Some(p.to_string())
        }
    };
    Ok(ValidatedAdminUpdate {
        email: input.email.as_deref().map(normalize_email).transpose()?,
        first_name: input
            .first_name
            .as_deref()
            .map(|v| normalize_name("First name", v))
            .transpose()?,
        last_name: input
            .last_name
            .as_deref()
            .map(|v| normalize_name("Last name", v))
            .transpose()?,
        role: input.role,
        permissions: input.permissions,
        password,
    })
}

/// Check that `actor` may deactivate account `target_id`.
///
/// Deactivation is one-way through this API, and an admin may not
/// deactivate their own account.
pub fn check_deactivate(actor: &Actor, target_id: DbId) -> Result<(), CoreError> {
    require(actor, Capability::ManageAdmins)?;
    if actor.admin_id == target_id {
        return Err(CoreError::Validation(
            "You cannot deactivate your own account".into(),
        ));
    }
    Ok(())
}
