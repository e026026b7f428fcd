//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.
//! - [`session`] -- client-side session state and renewal cadence.

pub mod jwt;
pub mod password;
pub mod session;
