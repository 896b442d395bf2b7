//! Form validation.
//!
//! Forms arrive as urlencoded strings. Each form validates into a typed
//! input or a [`FormErrors`] map that the page re-renders next to the fields.

mod auth;
mod comment;
mod post;
mod profile;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::{ValidateEmail, ValidateLength};

pub use auth::{LoginForm, LoginInput, RegistrationForm, RegistrationInput};
pub use comment::{CommentForm, CommentInput};
pub use post::{PostForm, PostInput};
pub use profile::{ProfileEditForm, ProfileInput};

pub const TITLE_MAX_LENGTH: usize = 256;
pub const NAME_MAX_LENGTH: usize = 150;
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Field name to error messages. Errors not tied to a field go under `__all__`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub const NON_FIELD: &'static str = "__all__";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Shorthand for a form with a single error.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// `Ok(value)` when no errors were collected.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Trimmed value, or a "required" error.
pub(crate) fn required(errors: &mut FormErrors, field: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "This field is required.");
    }
    value.to_string()
}

pub(crate) fn max_length(errors: &mut FormErrors, field: &str, value: &str, max: usize) {
    if !value.validate_length(None, Some(max as u64), None) {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max,
                value.chars().count()
            ),
        );
    }
}

/// Usernames: letters, digits and `@.+-_`, at most 150 characters.
pub(crate) fn username(errors: &mut FormErrors, value: &str) -> String {
    let value = required(errors, "username", value);
    max_length(errors, "username", &value, NAME_MAX_LENGTH);
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    value
}

/// Optional e-mail address; validated only when present.
pub(crate) fn optional_email(errors: &mut FormErrors, value: &str) -> String {
    let value = value.trim();
    if !value.is_empty() && !value.validate_email() {
        errors.add("email", "Enter a valid email address.");
    }
    max_length(errors, "email", value, EMAIL_MAX_LENGTH);
    value.to_string()
}
