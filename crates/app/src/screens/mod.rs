//! Screen controllers.
//!
//! Each screen is a plain struct holding its form state, an in-flight
//! flag, and the last notice to display. Controllers never touch the
//! network themselves; they hand validated payloads to the app loop and
//! receive completions back. A screen with an outstanding request
//! ignores further submissions until the result arrives.

mod credentials;
mod home;
mod product_form;

pub use credentials::{CredentialField, CredentialsForm};
pub use home::HomeScreen;
pub use product_form::{ProductForm, ProductFormField};

/// A transient message shown under a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    /// The message text, regardless of kind.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(msg) | Self::Error(msg) => msg,
        }
    }
}
