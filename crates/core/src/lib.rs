//! Longeviva Core - Shared types library.
//!
//! This crate provides common types used across the Longeviva admin tooling:
//! - `admin` - Firebase clients, admin account service and the `createAdminUser` endpoint
//! - `cli` - Command-line tools to create, delete and list admin accounts
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identity IDs, emails, roles and claims
//! - [`validation`] - Input validation for new admin accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{Confirmation, MIN_PASSWORD_LENGTH, NewAdmin, ValidationError};
