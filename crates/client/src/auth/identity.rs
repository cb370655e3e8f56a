//! REST client for the managed auth provider.
//!
//! Speaks the Identity Toolkit protocol: `accounts:signInWithPassword`
//! and `accounts:signUp`, with the API key as a query parameter. Error
//! responses carry `{"error": {"message": ...}}`; the message is passed
//! through verbatim.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use punguin_core::{Email, OwnerId, Session};

use crate::config::ClientConfig;

use super::{AuthError, AuthProvider};

/// Client for the auth provider's REST API.
#[derive(Clone)]
pub struct IdentityClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdentityResponse {
    local_id: String,
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl IdentityClient {
    /// Create a new auth client from configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.auth_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }

    /// Execute one credential operation (`signInWithPassword` or
    /// `signUp`).
    async fn execute(
        &self,
        operation: &str,
        email: &Email,
        password: &str,
    ) -> Result<Session, AuthError> {
        let url = format!(
            "{}/accounts:{}?key={}",
            self.base_url,
            operation,
            self.api_key.expose_secret()
        );
        let body = CredentialRequest {
            email: email.as_str(),
            password,
            return_secure_token: true,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&response_text)
                .map_or_else(|_| format!("HTTP {status}"), |e| e.error.message);
            warn!(%status, operation, message, "auth provider rejected request");
            return Err(AuthError::Provider { message });
        }

        let payload: IdentityResponse = serde_json::from_str(&response_text)?;
        let email = Email::parse(&payload.email)?;

        Ok(Session::new(
            OwnerId::new(payload.local_id),
            email,
            payload.id_token,
        ))
    }
}

#[async_trait]
impl AuthProvider for IdentityClient {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Session, AuthError> {
        self.execute("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &Email, password: &str) -> Result<Session, AuthError> {
        self.execute("signUp", email, password).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_message_extraction() {
        let body = r#"{"error": {"code": 400, "message": "EMAIL_NOT_FOUND"}}"#;
        let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.message, "EMAIL_NOT_FOUND");
    }

    #[test]
    fn test_identity_response_parsing() {
        let body = r#"{
            "kind": "identitytoolkit#SignupNewUserResponse",
            "localId": "u-42",
            "email": "user@example.com",
            "idToken": "tok",
            "refreshToken": "r",
            "expiresIn": "3600"
        }"#;
        let parsed: IdentityResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.local_id, "u-42");
        assert_eq!(parsed.email, "user@example.com");
        assert_eq!(parsed.id_token, "tok");
    }
}
