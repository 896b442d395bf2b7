use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FormErrors, TITLE_MAX_LENGTH, max_length, required};
use crate::domain::{NewPost, Post};

/// Format of the `datetime-local` input used for `pub_date`.
pub const PUB_DATE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

const PUB_DATE_FALLBACK_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// The post create/edit form. Everything but the author is editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    /// Checkbox: present (any value) means checked.
    pub is_published: Option<String>,
    pub category: String,
    pub location: String,
}

/// A validated post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
}

impl PostForm {
    /// The empty create form; new posts start out published.
    pub fn blank() -> Self {
        Self {
            is_published: Some("on".to_string()),
            ..Self::default()
        }
    }

    /// The edit form pre-filled from an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            pub_date: post.pub_date.format(PUB_DATE_INPUT_FORMAT).to_string(),
            is_published: post.is_published.then(|| "on".to_string()),
            category: post.category_id.map(|id| id.to_string()).unwrap_or_default(),
            location: post.location_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<PostInput, FormErrors> {
        let mut errors = FormErrors::new();

        let title = required(&mut errors, "title", &self.title);
        max_length(&mut errors, "title", &title, TITLE_MAX_LENGTH);
        let text = required(&mut errors, "text", &self.text);

        let pub_date = match self.pub_date.trim() {
            "" => {
                errors.add("pub_date", "This field is required.");
                None
            }
            raw => {
                let parsed = parse_pub_date(raw);
                if parsed.is_none() {
                    errors.add("pub_date", "Enter a valid date/time.");
                }
                parsed
            }
        };

        let category_id = optional_id(&mut errors, "category", &self.category);
        let location_id = optional_id(&mut errors, "location", &self.location);

        match pub_date {
            Some(pub_date) => errors.finish(|| PostInput {
                title,
                text,
                pub_date,
                is_published: self.is_published.is_some(),
                category_id,
                location_id,
            }),
            None => Err(errors),
        }
    }
}

impl PostInput {
    pub fn into_new_post(self, author_id: i64) -> NewPost {
        NewPost {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            is_published: self.is_published,
            author_id,
            category_id: self.category_id,
            location_id: self.location_id,
        }
    }

    /// Overwrite the editable fields; author, id and creation time stay.
    pub fn apply_to(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
        post.pub_date = self.pub_date;
        post.is_published = self.is_published;
        post.category_id = self.category_id;
        post.location_id = self.location_id;
    }
}

/// Datetime-local values carry no zone and are read as UTC.
fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    std::iter::once(PUB_DATE_INPUT_FORMAT)
        .chain(PUB_DATE_FALLBACK_FORMATS)
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

fn optional_id(errors: &mut FormErrors, field: &str, raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(
                field,
                "Select a valid choice. That choice is not one of the available choices.",
            );
            None
        }
    }
}
