//! In-memory repositories - used as fallback when no database is configured
//! and as the backing store of the HTTP tests.
//!
//! The store mirrors the PostgreSQL schema: ids come from per-table
//! sequences, usernames and slugs are unique, and deletes cascade the same
//! way the foreign keys do. Data is lost on process restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blogicum_core::domain::{
    Category, Comment, CommentWithAuthor, Location, NewCategory, NewComment, NewLocation, NewPost,
    NewUser, Post, PostCard, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::query::{PostQuery, newest_first};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }

    fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    fn get_mut(&mut self, id: i64) -> Result<&mut T, RepoError> {
        self.rows.get_mut(&id).ok_or(RepoError::NotFound)
    }

    fn remove(&mut self, id: i64) -> Result<T, RepoError> {
        self.rows.remove(&id).ok_or(RepoError::NotFound)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

#[derive(Default)]
struct Tables {
    users: Table<User>,
    categories: Table<Category>,
    locations: Table<Location>,
    posts: Table<Post>,
    comments: Table<Comment>,
}

impl Tables {
    fn card(&self, post: &Post) -> Result<PostCard, RepoError> {
        let author = self.users.get(post.author_id).cloned().ok_or_else(|| {
            RepoError::Query(format!("post {} references a missing author", post.id))
        })?;
        Ok(PostCard {
            author,
            category: post
                .category_id
                .and_then(|id| self.categories.get(id).cloned()),
            location: post.location_id.and_then(|id| self.locations.get(id).cloned()),
            comment_count: self
                .comments
                .values()
                .filter(|c| c.post_id == post.id)
                .count() as u64,
            post: post.clone(),
        })
    }

    fn remove_post(&mut self, post_id: i64) -> Result<(), RepoError> {
        self.posts.remove(post_id)?;
        self.comments.rows.retain(|_, c| c.post_id != post_id);
        Ok(())
    }
}

/// Shared in-memory store. Hand out repositories with the accessor methods.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn users(self: &Arc<Self>) -> InMemoryUserRepository {
        InMemoryUserRepository {
            store: Arc::clone(self),
        }
    }

    pub fn categories(self: &Arc<Self>) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository {
            store: Arc::clone(self),
        }
    }

    pub fn locations(self: &Arc<Self>) -> InMemoryLocationRepository {
        InMemoryLocationRepository {
            store: Arc::clone(self),
        }
    }

    pub fn posts(self: &Arc<Self>) -> InMemoryPostRepository {
        InMemoryPostRepository {
            store: Arc::clone(self),
        }
    }

    pub fn comments(self: &Arc<Self>) -> InMemoryCommentRepository {
        InMemoryCommentRepository {
            store: Arc::clone(self),
        }
    }
}

pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<User, NewUser, i64> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.store.tables.read().await.users.get(id).cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                new.username
            )));
        }
        Ok(tables.users.insert_with(|id| User {
            id,
            username: new.username,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            password_hash: new.password_hash,
            date_joined: new.date_joined,
        }))
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        let stored = tables.users.get_mut(user.id)?;
        *stored = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.users.remove(id)?;
        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id)?;
        }
        tables.comments.rows.retain(|_, c| c.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

pub struct InMemoryCategoryRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<Category, NewCategory, i64> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Category>, RepoError> {
        Ok(self.store.tables.read().await.categories.get(id).cloned())
    }

    async fn create(&self, new: NewCategory) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.categories.values().any(|c| c.slug == new.slug) {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already exists",
                new.slug
            )));
        }
        Ok(tables.categories.insert_with(|id| Category {
            id,
            title: new.title,
            description: new.description,
            slug: new.slug,
            is_published: new.is_published,
            created_at: Utc::now(),
        }))
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        let stored = tables.categories.get_mut(category.id)?;
        *stored = category.clone();
        Ok(category)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.categories.remove(id)?;
        for post in tables.posts.rows.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.slug == slug && c.is_published)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

pub struct InMemoryLocationRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<Location, NewLocation, i64> for InMemoryLocationRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Location>, RepoError> {
        Ok(self.store.tables.read().await.locations.get(id).cloned())
    }

    async fn create(&self, new: NewLocation) -> Result<Location, RepoError> {
        let mut tables = self.store.tables.write().await;
        Ok(tables.locations.insert_with(|id| Location {
            id,
            name: new.name,
            is_published: new.is_published,
            created_at: Utc::now(),
        }))
    }

    async fn update(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.store.tables.write().await;
        let stored = tables.locations.get_mut(location.id)?;
        *stored = location.clone();
        Ok(location)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.locations.remove(id)?;
        for post in tables.posts.rows.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut locations: Vec<Location> = tables.locations.values().cloned().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}

pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<Post, NewPost, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.store.tables.read().await.posts.get(id).cloned())
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.users.get(new.author_id).is_none() {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                new.author_id
            )));
        }
        Ok(tables.posts.insert_with(|id| Post {
            id,
            title: new.title,
            text: new.text,
            pub_date: new.pub_date,
            is_published: new.is_published,
            author_id: new.author_id,
            category_id: new.category_id,
            location_id: new.location_id,
            created_at: Utc::now(),
        }))
    }

    /// Author and creation time are kept from the stored row.
    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        let stored = tables.posts.get_mut(post.id)?;
        stored.title = post.title;
        stored.text = post.text;
        stored.pub_date = post.pub_date;
        stored.is_published = post.is_published;
        stored.category_id = post.category_id;
        stored.location_id = post.location_id;
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.store.tables.write().await.remove_post(id)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_card(&self, id: i64) -> Result<Option<PostCard>, RepoError> {
        let tables = self.store.tables.read().await;
        tables.posts.get(id).map(|post| tables.card(post)).transpose()
    }

    async fn list(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostCard>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| {
                let category = post.category_id.and_then(|id| tables.categories.get(id));
                query.matches(post, category)
            })
            .collect();
        posts.sort_by(|a, b| newest_first(a, b));

        let total_items = posts.len() as u64;
        let items = posts
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.per_page as usize)
            .map(|post| tables.card(post))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, page, total_items))
    }
}

pub struct InMemoryCommentRepository {
    store: Arc<InMemoryStore>,
}

#[async_trait]
impl BaseRepository<Comment, NewComment, i64> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.tables.read().await.comments.get(id).cloned())
    }

    async fn create(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        if tables.posts.get(new.post_id).is_none() {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                new.post_id
            )));
        }
        Ok(tables.comments.insert_with(|id| Comment {
            id,
            text: new.text,
            author_id: new.author_id,
            post_id: new.post_id,
            created_at: new.created_at,
        }))
    }

    /// Only the text changes.
    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.store.tables.write().await;
        let stored = tables.comments.get_mut(comment.id)?;
        stored.text = comment.text;
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.store.tables.write().await.comments.remove(id)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        comments
            .into_iter()
            .map(|comment| {
                let author = tables.users.get(comment.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!("comment {} references a missing author", comment.id))
                })?;
                Ok(CommentWithAuthor {
                    comment: comment.clone(),
                    author,
                })
            })
            .collect()
    }
}
