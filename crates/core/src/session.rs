//! The authenticated session identity.

use secrecy::SecretString;

use crate::types::{Email, OwnerId};

/// An authenticated session.
///
/// Exists only while signed in: created by a successful sign-in or
/// sign-up, destroyed by sign-out. The session store owns the single
/// current value; everything else holds a read reference.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque user ID assigned by the auth provider. Scopes every store
    /// operation.
    pub uid: OwnerId,
    /// The signed-in email address.
    pub email: Email,
    /// Provider-issued ID token, sent with store requests. Redacted from
    /// `Debug` output by `SecretString`.
    pub id_token: SecretString,
}

impl Session {
    /// Create a session from provider-issued identity data.
    #[must_use]
    pub fn new(uid: OwnerId, email: Email, id_token: impl Into<SecretString>) -> Self {
        Self {
            uid,
            email,
            id_token: id_token.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new(
            OwnerId::new("u-1"),
            Email::parse("user@example.com").unwrap(),
            "super-secret-token".to_owned(),
        );
        let debug = format!("{session:?}");
        assert!(debug.contains("u-1"));
        assert!(!debug.contains("super-secret-token"));
    }
}
