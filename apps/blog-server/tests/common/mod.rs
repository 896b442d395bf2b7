//! Shared helpers for the blog-server integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test;
use chrono::{DateTime, TimeDelta, Utc};

use blog_server::config::default_templates_dir;
use blog_server::{AppConfig, AppState, Repositories, Templates};
use blogicum_core::domain::{
    Category, Comment, Location, NewCategory, NewComment, NewLocation, NewPost, NewUser, Post,
    User,
};
use blogicum_core::ports::BaseRepository;
use blogicum_infra::Argon2PasswordService;
use blogicum_infra::database::InMemoryStore;

pub const PASSWORD: &str = "correct-horse-battery";

/// An application state over a fresh in-memory store, plus the store
/// itself for seeding and inspection.
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = InMemoryStore::new();
        let templates = Templates::load(default_templates_dir()).expect("templates compile");
        let mut state = AppState::new(Repositories::in_memory(&store), templates, &config);
        // Full-cost argon2 is slow in debug builds.
        state.passwords = Arc::new(Argon2PasswordService::with_cost(1024, 1).unwrap());
        Self { store, state }
    }

    /// A user whose password is [`PASSWORD`].
    pub async fn user(&self, username: &str) -> User {
        let hash = self.state.passwords.hash(PASSWORD).unwrap();
        self.store
            .users()
            .create(NewUser::new(
                username.to_string(),
                format!("{}@example.com", username),
                hash,
            ))
            .await
            .unwrap()
    }

    pub async fn category(&self, title: &str, slug: &str) -> Category {
        self.store
            .categories()
            .create(NewCategory::new(title, slug))
            .await
            .unwrap()
    }

    pub async fn hidden_category(&self, title: &str, slug: &str) -> Category {
        self.store
            .categories()
            .create(NewCategory::new(title, slug).unpublished())
            .await
            .unwrap()
    }

    pub async fn location(&self, name: &str) -> Location {
        self.store
            .locations()
            .create(NewLocation::new(name))
            .await
            .unwrap()
    }

    pub async fn post(&self, draft: NewPost) -> Post {
        self.store.posts().create(draft).await.unwrap()
    }

    /// A post that every visitor can see.
    pub async fn published_post(&self, author: &User, category: &Category, title: &str) -> Post {
        let draft = NewPost::new(author.id, title.to_string(), "Body".to_string(), hours_ago(1))
            .in_category(category.id);
        self.post(draft).await
    }

    pub async fn comment(&self, post: &Post, author: &User, text: &str) -> Comment {
        self.store
            .comments()
            .create(NewComment::new(post.id, author.id, text.to_string()))
            .await
            .unwrap()
    }

    /// Rename `user` directly in the store, leaving issued tokens untouched.
    pub async fn rename(&self, user: &User, username: &str) -> User {
        let mut renamed = user.clone();
        renamed.username = username.to_string();
        self.store.users().update(renamed).await.unwrap()
    }

    pub async fn find_post(&self, id: i64) -> Option<Post> {
        self.store.posts().find_by_id(id).await.unwrap()
    }

    pub async fn find_comment(&self, id: i64) -> Option<Comment> {
        self.store.comments().find_by_id(id).await.unwrap()
    }

    /// `Authorization: Bearer ...` for `user`.
    pub fn bearer(&self, user: &User) -> (header::HeaderName, String) {
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();
        (header::AUTHORIZATION, format!("Bearer {}", token))
    }
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - TimeDelta::hours(hours)
}

pub fn days_ahead(days: i64) -> DateTime<Utc> {
    Utc::now() + TimeDelta::days(days)
}

pub async fn body_text<B: MessageBody>(response: ServiceResponse<B>) -> String {
    let bytes = test::read_body(response).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location<B>(response: &ServiceResponse<B>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response has a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// The value of the session cookie set by `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<String> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "access_token")
        .map(|cookie| cookie.value().to_string())
}
