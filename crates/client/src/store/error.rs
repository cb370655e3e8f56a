//! Product store error types.

use thiserror::Error;

use punguin_core::ProductField;

/// Errors that can occur when establishing a subscription.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request (e.g. permission denied).
    #[error("{message}")]
    Rejected {
        /// Store-supplied error message, surfaced verbatim.
        message: String,
    },

    /// The store response could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur during create, update, or remove.
///
/// Terminal per attempt; the form state that produced the write is
/// preserved so the user can retry without re-entering data.
#[derive(Debug, Error)]
pub enum WriteError {
    /// A required field was empty. Caught locally; the store is never
    /// contacted.
    #[error("missing required field: {}", .0.label())]
    IncompleteFields(ProductField),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the write. The message is store-supplied and
    /// surfaced verbatim.
    #[error("{message}")]
    Rejected {
        /// Store-supplied error message.
        message: String,
    },

    /// The store response could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
