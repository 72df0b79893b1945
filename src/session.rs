use log::debug;
use std::sync::{Arc, PoisonError, RwLock};

/// Authentication state shared by every client built from the same session.
///
/// Cloning a `Session` yields another handle to the same token: signing in
/// through the auth client is immediately visible to the recipe client.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session that is already signed in
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(token);
        session
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(token.into());
        debug!("Session signed in");
    }

    pub fn sign_out(&self) {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        if guard.take().is_some() {
            debug!("Session signed out");
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
