use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - the author of posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// "First Last", falling back to the username when both are blank.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub date_joined: DateTime<Utc>,
}

impl NewUser {
    /// Create a new user with blank names, joined now.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            first_name: String::new(),
            last_name: String::new(),
            email,
            password_hash,
            date_joined: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: String::new(),
            password_hash: "hash".to_string(),
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        assert_eq!(user("Alice", "Liddell").display_name(), "Alice Liddell");
        assert_eq!(user("Alice", "").display_name(), "Alice");
        assert_eq!(user("", "").display_name(), "alice");
    }

    #[test]
    fn test_password_hash_is_never_serialized() {
        let json = serde_json::to_string(&user("A", "B")).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("hash\""));
    }
}
