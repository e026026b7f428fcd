//! Stored entity models.
//!
//! Each submodule contains:
//! - The domain-facing entity struct returned by the store traits
//! - A `FromRow` row struct matching the database columns, converted with `TryFrom`
//! - Insert/update DTOs

pub mod admin;
pub mod suggestion;
