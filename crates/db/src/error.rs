//! Store-level error type shared by every backend.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness rule was violated by a backend without SQL constraints.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored value no longer parses into the domain types.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}
