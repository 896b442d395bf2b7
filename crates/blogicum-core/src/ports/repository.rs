use async_trait::async_trait;

use crate::domain::{
    Category, Comment, CommentWithAuthor, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostCard, User,
};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};
use crate::query::PostQuery;

/// Generic repository trait defining standard CRUD operations.
///
/// `T` is the stored record, `N` the not-yet-persisted draft whose id the
/// store assigns.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return it with its assigned ID.
    async fn create(&self, new: N) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser, i64> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, NewCategory, i64> {
    /// The category behind `/category/<slug>/`; unpublished ones are hidden.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Every category, for the post form's choices.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait LocationRepository: BaseRepository<Location, NewLocation, i64> {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError>;
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost, i64> {
    /// One post with author, category, location and comment count.
    async fn find_card(&self, id: i64) -> Result<Option<PostCard>, RepoError>;

    /// A page of posts matching `query`, newest first.
    async fn list(&self, query: &PostQuery, page: PageRequest)
    -> Result<Page<PostCard>, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, NewComment, i64> {
    /// Comments under a post in creation order, with their authors.
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, RepoError>;
}
