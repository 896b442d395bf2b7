use serde::{Deserialize, Serialize};

use super::{FormErrors, PASSWORD_MIN_LENGTH, optional_email, required, username};

/// Sign-up form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<RegistrationInput, FormErrors> {
        let mut errors = FormErrors::new();

        let username = username(&mut errors, &self.username);
        let email = optional_email(&mut errors, &self.email);

        if self.password1.is_empty() {
            errors.add("password1", "This field is required.");
        } else if self.password1.chars().count() < PASSWORD_MIN_LENGTH {
            errors.add(
                "password1",
                format!(
                    "This password is too short. It must contain at least {} characters.",
                    PASSWORD_MIN_LENGTH
                ),
            );
        }
        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.finish(|| RegistrationInput {
            username,
            email,
            password: self.password1.clone(),
        })
    }
}

/// Sign-in form. `next` is where to go after a successful login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginInput, FormErrors> {
        let mut errors = FormErrors::new();
        let username = required(&mut errors, "username", &self.username);
        if self.password.is_empty() {
            errors.add("password", "This field is required.");
        }
        errors.finish(|| LoginInput {
            username,
            password: self.password.clone(),
        })
    }

    /// The redirect target after login; only local paths are honoured.
    pub fn safe_next(&self) -> &str {
        match self.next.as_deref() {
            Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
            _ => "/",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password1: &str, password2: &str) -> RegistrationForm {
        RegistrationForm {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        }
    }

    #[test]
    fn test_registration_passwords() {
        assert!(registration("correct horse", "correct horse").validate().is_ok());

        let errors = registration("short", "short").validate().unwrap_err();
        assert!(errors.has("password1"));

        let errors = registration("correct horse", "battery staple")
            .validate()
            .unwrap_err();
        assert!(errors.has("password2"));
        assert!(!errors.has("password1"));
    }

    #[test]
    fn test_login_next_is_local_only() {
        let mut form = LoginForm::default();
        assert_eq!(form.safe_next(), "/");

        form.next = Some("/posts/create/".to_string());
        assert_eq!(form.safe_next(), "/posts/create/");

        form.next = Some("https://evil.example/".to_string());
        assert_eq!(form.safe_next(), "/");

        form.next = Some("//evil.example/".to_string());
        assert_eq!(form.safe_next(), "/");
    }
}
