//! Core types for Longeviva admin tooling.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod identity;
pub mod role;
pub mod uid;

pub use email::{Email, EmailError};
pub use identity::{IdentityRecord, UserMetadata};
pub use role::{AdminClaims, AdminRole};
pub use uid::Uid;
