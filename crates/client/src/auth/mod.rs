//! Authentication boundary and session tracking.
//!
//! [`AuthProvider`] is the contract with the external auth service;
//! [`IdentityClient`] is its REST implementation. [`SessionStore`] owns
//! the single current [`Session`] and broadcasts changes to subscribers,
//! delivering the current state immediately on subscription.

mod error;
mod identity;

pub use error::AuthError;
pub use identity::IdentityClient;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

use punguin_core::{Email, Session};

/// The external auth provider boundary.
///
/// Failures are terminal for that attempt; there is no retry logic
/// anywhere in this layer.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Sign in with email and password.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Session, AuthError>;

    /// Create an account with email and password. A successful sign-up
    /// also signs the user in.
    async fn sign_up(&self, email: &Email, password: &str) -> Result<Session, AuthError>;
}

/// Tracks the current authenticated identity.
///
/// Owns the only mutable session state in the system. Subscribers
/// observe changes through [`SessionWatcher`]; the rest of the app
/// receives the session as explicit context, never through globals.
pub struct SessionStore {
    provider: Arc<dyn AuthProvider>,
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Create a session store with no active session.
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { provider, tx }
    }

    /// Sign in and publish the new session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidEmail`] before any network call for
    /// malformed input, or the provider's error verbatim. The current
    /// session (normally absent) is left untouched on failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        let session = self.provider.sign_in(&email, password).await?;
        info!(uid = %session.uid, "signed in");
        self.tx.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Create an account, sign in, and publish the new session.
    ///
    /// # Errors
    ///
    /// Same contract as [`SessionStore::sign_in`].
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        let session = self.provider.sign_up(&email, password).await?;
        info!(uid = %session.uid, "account created");
        self.tx.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Destroy the current session, if any.
    ///
    /// # Errors
    ///
    /// Never fails today: the provider keeps no server-side session for
    /// this client beyond the issued token, which is simply dropped. The
    /// `Result` is part of the contract so a provider that can reject
    /// sign-out fits behind the same surface.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        if self.tx.send_replace(None).is_some() {
            info!("signed out");
        }
        Ok(())
    }

    /// The current session, if signed in.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Subscribe to session changes.
    ///
    /// The watcher observes the current state immediately and every
    /// subsequent change.
    #[must_use]
    pub fn subscribe(&self) -> SessionWatcher {
        SessionWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

/// A subscription to session changes.
pub struct SessionWatcher {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionWatcher {
    /// The session state as of the latest change.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    /// Wait for the next session change and return the new state.
    ///
    /// Returns `None` if the [`SessionStore`] was dropped.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use punguin_core::OwnerId;

    /// Provider that accepts any credentials and derives the uid from
    /// the email's local part.
    struct FakeProvider;

    #[async_trait]
    impl AuthProvider for FakeProvider {
        async fn sign_in(&self, email: &Email, _password: &str) -> Result<Session, AuthError> {
            Ok(Session::new(
                OwnerId::new(format!("uid-{email}")),
                email.clone(),
                "token".to_owned(),
            ))
        }

        async fn sign_up(&self, email: &Email, password: &str) -> Result<Session, AuthError> {
            self.sign_in(email, password).await
        }
    }

    /// Provider that rejects everything with a fixed message.
    struct RejectingProvider;

    #[async_trait]
    impl AuthProvider for RejectingProvider {
        async fn sign_in(&self, _email: &Email, _password: &str) -> Result<Session, AuthError> {
            Err(AuthError::Provider {
                message: "INVALID_PASSWORD".to_owned(),
            })
        }

        async fn sign_up(&self, _email: &Email, _password: &str) -> Result<Session, AuthError> {
            Err(AuthError::Provider {
                message: "EMAIL_EXISTS".to_owned(),
            })
        }
    }

    #[tokio::test]
    async fn test_sign_in_publishes_session() {
        let store = SessionStore::new(Arc::new(FakeProvider));
        assert!(store.current().is_none());

        let session = store.sign_in("user@example.com", "pw").await.unwrap();
        assert_eq!(session.uid.as_str(), "uid-user@example.com");
        assert_eq!(store.current().unwrap().uid, session.uid);
    }

    #[tokio::test]
    async fn test_invalid_email_fails_before_provider() {
        let store = SessionStore::new(Arc::new(RejectingProvider));
        let err = store.sign_in("not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail(_)));
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_provider_message_surfaced_verbatim() {
        let store = SessionStore::new(Arc::new(RejectingProvider));
        let err = store.sign_in("user@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "INVALID_PASSWORD");
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_watcher_sees_immediate_state_and_changes() {
        let store = SessionStore::new(Arc::new(FakeProvider));
        let mut watcher = store.subscribe();

        // Immediate state on subscription.
        assert!(watcher.current().is_none());

        store.sign_up("new@example.com", "pw").await.unwrap();
        let observed = watcher.changed().await.unwrap();
        assert!(observed.is_some());

        store.sign_out().unwrap();
        let observed = watcher.changed().await.unwrap();
        assert!(observed.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_noop() {
        let store = SessionStore::new(Arc::new(FakeProvider));
        assert!(store.sign_out().is_ok());
        assert!(store.current().is_none());
    }
}
