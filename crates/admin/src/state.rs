//! Application state shared across handlers.

use std::sync::Arc;

use crate::firebase::{DocumentStore, FirebaseClients, IdentityProvider};
use crate::services::AdminAccountService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the identity provider and document
/// store built once at startup. Requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    auth: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(auth: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { auth, store }),
        }
    }

    /// State backed by the Firebase REST clients.
    #[must_use]
    pub fn from_clients(clients: FirebaseClients) -> Self {
        Self::new(Arc::new(clients.auth), Arc::new(clients.firestore))
    }

    /// Get a reference to the identity provider.
    #[must_use]
    pub fn auth(&self) -> &dyn IdentityProvider {
        self.inner.auth.as_ref()
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Admin account service over this state's clients.
    ///
    /// Compensation stays off: the endpoint reports failures without
    /// cleaning up.
    #[must_use]
    pub fn accounts(&self) -> AdminAccountService<'_> {
        AdminAccountService::new(self.auth(), self.store())
    }
}
