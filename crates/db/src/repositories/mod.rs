//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument and return raw rows.

pub mod admin_repo;
pub mod suggestion_repo;

pub use admin_repo::AdminRepo;
pub use suggestion_repo::SuggestionRepo;
