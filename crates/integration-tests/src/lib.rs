//! Integration tests for Longeviva admin tooling.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p longeviva-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `admin_accounts` - Admin account service over the in-memory backend
//! - `create_admin_endpoint` - `createAdminUser` router, status mapping and
//!   CORS headers
//!
//! Everything runs in-process against [`InMemoryFirebase`]; no emulator or
//! network access is needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use longeviva_admin::firebase::InMemoryFirebase;
use longeviva_admin::state::AppState;

/// A shared in-memory backend and an app state over it.
#[must_use]
pub fn in_memory_state() -> (Arc<InMemoryFirebase>, AppState) {
    state_over(InMemoryFirebase::new())
}

/// App state over a pre-configured backend.
#[must_use]
pub fn state_over(firebase: InMemoryFirebase) -> (Arc<InMemoryFirebase>, AppState) {
    let firebase = Arc::new(firebase);
    let state = AppState::new(firebase.clone(), firebase.clone());
    (firebase, state)
}
