//! Domain logic for the anonymous feedback system.
//!
//! No I/O lives here: persistence is behind the store traits in `ghost-db`
//! and transport is `ghost-api`.

pub mod admin;
pub mod error;
pub mod export;
pub mod permissions;
pub mod query;
pub mod stats;
pub mod suggestion;
pub mod taxonomy;
pub mod text;
pub mod types;
