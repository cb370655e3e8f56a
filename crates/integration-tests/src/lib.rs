//! Scenario tests for Punguin.
//!
//! These tests wire the real `SessionStore` and the in-memory
//! `ProductStore` together and walk through user journeys end to end:
//! sign-up, product CRUD, list derivation, sign-out. No network is
//! involved; the auth provider is scripted.
//!
//! # Running
//!
//! ```bash
//! cargo test -p punguin-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use async_trait::async_trait;

use punguin_client::{AuthError, AuthProvider};
use punguin_core::{Email, OwnerId, Session};

/// An auth provider scripted for tests.
///
/// Accepts any credentials, derives a stable uid from the email's local
/// part, and tracks which emails have signed up so a duplicate sign-up
/// is rejected the way the real provider rejects it.
#[derive(Default)]
pub struct ScriptedProvider {
    registered: std::sync::Mutex<Vec<String>>,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn session_for(email: &Email) -> Session {
        let local = email.as_str().split('@').next().unwrap_or_default();
        Session::new(
            OwnerId::new(format!("uid-{local}")),
            email.clone(),
            format!("token-{local}"),
        )
    }
}

#[async_trait]
impl AuthProvider for ScriptedProvider {
    async fn sign_in(&self, email: &Email, _password: &str) -> Result<Session, AuthError> {
        Ok(Self::session_for(email))
    }

    async fn sign_up(&self, email: &Email, password: &str) -> Result<Session, AuthError> {
        // The guard must not live across the await below.
        {
            let mut registered = self
                .registered
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if registered.iter().any(|e| e == email.as_str()) {
                return Err(AuthError::Provider {
                    message: "EMAIL_EXISTS".to_owned(),
                });
            }
            registered.push(email.as_str().to_owned());
        }
        self.sign_in(email, password).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    // tokio::spawn demands a Send future, so this fails to compile if
    // sign_up ever holds the registration lock across its await again.
    #[tokio::test]
    async fn test_sign_up_runs_on_a_spawned_task() {
        let provider = Arc::new(ScriptedProvider::new());

        let handle = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move {
                let email = Email::parse("owner@example.com").unwrap();
                provider.sign_up(&email, "pw").await
            }
        });

        let session = handle.await.unwrap().unwrap();
        assert_eq!(session.uid.as_str(), "uid-owner");
    }

    #[tokio::test]
    async fn test_second_sign_up_for_same_email_rejected() {
        let provider = ScriptedProvider::new();
        let email = Email::parse("owner@example.com").unwrap();

        provider.sign_up(&email, "pw").await.unwrap();
        let err = provider.sign_up(&email, "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "EMAIL_EXISTS");
    }
}
