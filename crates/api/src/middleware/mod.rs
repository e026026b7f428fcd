//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the acting admin from a JWT Bearer token.
//! - [`rbac`] -- One extractor per capability, e.g. [`rbac::RequireManageAdmins`].

pub mod auth;
pub mod rbac;
