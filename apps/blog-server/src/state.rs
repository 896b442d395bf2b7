//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PasswordService, PostRepository,
    RateLimiter, TokenService, UserRepository,
};
use blogicum_infra::database::InMemoryStore;
use blogicum_infra::{Argon2PasswordService, InMemoryRateLimiter, JwtTokenService};

#[cfg(feature = "postgres")]
use blogicum_infra::database::{
    DatabaseConnections, PostgresCategoryRepository, PostgresCommentRepository,
    PostgresLocationRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;
use crate::templates::Templates;

/// The five repositories behind the blog, whichever store backs them.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    pub fn in_memory(store: &Arc<InMemoryStore>) -> Self {
        Self {
            users: Arc::new(store.users()),
            categories: Arc::new(store.categories()),
            locations: Arc::new(store.locations()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: &DatabaseConnections) -> Self {
        let db = &connections.main;
        Self {
            users: Arc::new(PostgresUserRepository::new(Arc::clone(db))),
            categories: Arc::new(PostgresCategoryRepository::new(Arc::clone(db))),
            locations: Arc::new(PostgresLocationRepository::new(Arc::clone(db))),
            posts: Arc::new(PostgresPostRepository::new(Arc::clone(db))),
            comments: Arc::new(PostgresCommentRepository::new(Arc::clone(db))),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// `None` disables rate limiting.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub templates: Arc<Templates>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Assemble the state around an already-chosen set of repositories.
    pub fn new(repos: Repositories, templates: Templates, config: &AppConfig) -> Self {
        Self {
            users: repos.users,
            categories: repos.categories,
            locations: repos.locations,
            posts: repos.posts,
            comments: repos.comments,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            rate_limiter: Some(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()))),
            templates: Arc::new(templates),
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Build the state described by `config`: PostgreSQL when `DATABASE_URL`
    /// is set and reachable, the in-memory store otherwise.
    pub async fn from_config(config: &AppConfig) -> Result<Self, tera::Error> {
        let templates = Templates::load(&config.templates_dir)?;

        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let connections = Arc::new(connections);
                    let mut state =
                        Self::new(Repositories::postgres(&connections), templates, config);
                    state.db = Some(connections);
                    tracing::info!("Application state initialized (postgres)");
                    return Ok(state);
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        }

        #[cfg(not(feature = "postgres"))]
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL is set but the postgres feature is disabled");
        }

        if config.database.is_none() {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        let store = InMemoryStore::new();
        let state = Self::new(Repositories::in_memory(&store), templates, config);
        tracing::info!("Application state initialized (in-memory)");
        Ok(state)
    }

    /// Whether the configured database answers; `true` for the in-memory store.
    pub async fn database_ok(&self) -> bool {
        #[cfg(feature = "postgres")]
        if let Some(db) = &self.db {
            return db.ping().await;
        }
        true
    }
}
