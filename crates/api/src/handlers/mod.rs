pub mod admins;
pub mod auth;
pub mod dashboard;
pub mod export;
pub mod public;
pub mod suggestions;
