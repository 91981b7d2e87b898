//! Business logic services for admin.
//!
//! # Services
//!
//! - `admin_accounts` - Create, verify, find, delete and list admin accounts

pub mod admin_accounts;

pub use admin_accounts::{
    AdminAccountError, AdminAccountService, CreateProgress, CreatedAdmin, VerificationReport,
};
