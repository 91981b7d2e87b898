//! Longeviva Admin library.
//!
//! Firebase admin account management shared by the `lv-cli` admin commands
//! and the `createAdminUser` HTTP function.
//!
//! # Security
//!
//! This crate holds HIGH PRIVILEGE access:
//! - Firebase Authentication (create, delete and list any user, set claims)
//! - Cloud Firestore (admin profile documents)
//!
//! Service account keys must never be committed or logged.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`firebase`] - Auth and Firestore REST clients, credentials, in-memory backend
//! - [`models`] - Admin document layout
//! - [`services`] - Admin account operations
//! - [`routes`] - `createAdminUser` HTTP handler
//! - [`state`] - Shared handler state
//! - [`error`] - HTTP error mapping

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod firebase;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
