use serde::{Deserialize, Serialize};

use super::{FormErrors, NAME_MAX_LENGTH, max_length, optional_email, username};
use crate::domain::User;

/// The profile edit form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileEditForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}

impl ProfileEditForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }

    /// Field rules only; whether the username is taken is checked against
    /// the user repository by the caller.
    pub fn validate(&self) -> Result<ProfileInput, FormErrors> {
        let mut errors = FormErrors::new();

        let first_name = self.first_name.trim().to_string();
        max_length(&mut errors, "first_name", &first_name, NAME_MAX_LENGTH);
        let last_name = self.last_name.trim().to_string();
        max_length(&mut errors, "last_name", &last_name, NAME_MAX_LENGTH);
        let username = username(&mut errors, &self.username);
        let email = optional_email(&mut errors, &self.email);

        errors.finish(|| ProfileInput {
            first_name,
            last_name,
            username,
            email,
        })
    }
}

impl ProfileInput {
    pub fn apply_to(self, user: &mut User) {
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user.username = self.username;
        user.email = self.email;
    }
}
