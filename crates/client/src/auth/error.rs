//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
///
/// Every failure is terminal for that attempt: the caller stays on the
/// same screen and the user must re-submit the form.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format, caught before any network call.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] punguin_core::EmailError),

    /// The provider rejected the request. The message is provider-supplied
    /// and surfaced verbatim to the user.
    #[error("{message}")]
    Provider {
        /// Provider-supplied error message (e.g. `EMAIL_NOT_FOUND`).
        message: String,
    },

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider response could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
