//! The sign-in / sign-up form.
//!
//! Both credential screens share the same form shape; the navigator
//! decides which operation a submission maps to.

use super::Notice;

/// Which input currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialField {
    #[default]
    Email,
    Password,
}

/// Email and password input state.
#[derive(Debug, Clone, Default)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
    pub focus: CredentialField,
    busy: bool,
    pub notice: Option<Notice>,
}

impl CredentialsForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submission is outstanding.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    /// Append a character to the focused field.
    pub fn insert_char(&mut self, ch: char) {
        match self.focus {
            CredentialField::Email => self.email.push(ch),
            CredentialField::Password => self.password.push(ch),
        }
    }

    /// Delete the last character of the focused field.
    pub fn backspace(&mut self) {
        let field = match self.focus {
            CredentialField::Email => &mut self.email,
            CredentialField::Password => &mut self.password,
        };
        field.pop();
    }

    /// Move focus to the other field.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            CredentialField::Email => CredentialField::Password,
            CredentialField::Password => CredentialField::Email,
        };
    }

    /// Take the credentials for submission.
    ///
    /// Returns `None` while a previous submission is outstanding; the
    /// caller must report its result through
    /// [`CredentialsForm::complete`] before the form accepts another.
    pub fn begin_submit(&mut self) -> Option<(String, String)> {
        if self.busy {
            return None;
        }
        self.busy = true;
        self.notice = None;
        Some((self.email.clone(), self.password.clone()))
    }

    /// Record the outcome of a submission.
    ///
    /// On failure the entered credentials are preserved so the user can
    /// correct and retry. Success needs no notice; the session change
    /// navigates away.
    pub fn complete(&mut self, result: Result<(), String>) {
        self.busy = false;
        if let Err(message) = result {
            self.notice = Some(Notice::Error(message));
        }
    }

    /// Reset the form, e.g. when switching between sign-in and sign-up.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
