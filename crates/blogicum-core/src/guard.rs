//! Ownership guards for edit and delete requests.
//!
//! Strangers are never told they lack permission: the guard sends them
//! back to the post they came from.

use crate::domain::{Comment, Post};
use crate::error::DomainError;

/// Anything with an immutable author.
pub trait Owned {
    fn author_id(&self) -> i64;

    fn is_owned_by(&self, requester: Option<i64>) -> bool {
        requester == Some(self.author_id())
    }
}

impl Owned for Post {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

impl Owned for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<T> {
    /// The requester owns the resource.
    Proceed(T),
    /// Send the requester to this post's detail page instead.
    RedirectToPost(i64),
}

/// Guard a post edit or delete.
pub fn guard_post(post: Post, requester: Option<i64>) -> Guarded<Post> {
    if post.is_owned_by(requester) {
        Guarded::Proceed(post)
    } else {
        Guarded::RedirectToPost(post.id)
    }
}

/// Guard a comment edit or delete addressed as `/posts/<post_id>/comment/<id>/`.
///
/// A comment filed under a different post is reported as missing.
pub fn guard_comment(
    comment: Comment,
    post_id: i64,
    requester: Option<i64>,
) -> Result<Guarded<Comment>, DomainError> {
    if comment.post_id != post_id {
        return Err(DomainError::not_found("comment", comment.id));
    }
    if comment.is_owned_by(requester) {
        Ok(Guarded::Proceed(comment))
    } else {
        Ok(Guarded::RedirectToPost(post_id))
    }
}
