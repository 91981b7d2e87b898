//! Domain models for admin.

pub mod admin_account;

pub use admin_account::{ADMIN_PROFILES, LEGACY_ADMINS};
