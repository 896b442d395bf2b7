use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Location, User};

/// Post entity - a publishable article with a scheduled publication time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A post that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author_id: i64,
    pub category_id: Option<i64>,
    pub location_id: Option<i64>,
}

impl NewPost {
    /// Create a published post without category or location.
    pub fn new(author_id: i64, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        Self {
            title,
            text,
            pub_date,
            is_published: true,
            author_id,
            category_id: None,
            location_id: None,
        }
    }

    pub fn in_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn at_location(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.is_published = false;
        self
    }
}

/// A post joined with everything a listing or detail page shows.
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    #[serde(flatten)]
    pub post: Post,
    pub author: User,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}
