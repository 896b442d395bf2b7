use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// Comment entity - a reply attached to exactly one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub author_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

impl NewComment {
    pub fn new(post_id: i64, author_id: i64, text: String) -> Self {
        Self {
            text,
            author_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}

/// A comment with its author, as listed under a post.
#[derive(Debug, Clone, Serialize)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: User,
}
