//! PostgreSQL repository implementations.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use blogicum_core::domain::{
    Category, CommentWithAuthor, Location, Post, PostCard, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_core::query::PostQuery;

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .filter(category::Column::IsPublished.eq(true))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Title)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list_all(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .order_by_asc(location::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentCount {
    post_id: i64,
    count: i64,
}

impl PostgresPostRepository {
    /// Attach authors, categories, locations and comment counts to a batch
    /// of posts with one query per relation.
    async fn load_cards(&self, posts: Vec<post::Model>) -> Result<Vec<PostCard>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let author_ids: BTreeSet<i64> = posts.iter().map(|p| p.author_id).collect();
        let category_ids: BTreeSet<i64> = posts.iter().filter_map(|p| p.category_id).collect();
        let location_ids: BTreeSet<i64> = posts.iter().filter_map(|p| p.location_id).collect();

        let authors: HashMap<i64, User> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|m| (m.id, m.into()))
            .collect();

        let categories: HashMap<i64, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(self.db.as_ref())
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect()
        };

        let locations: HashMap<i64, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(self.db.as_ref())
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|m| (m.id, m.into()))
                .collect()
        };

        let counts: HashMap<i64, u64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(comment::Column::Id.count(), "count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_model::<CommentCount>()
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|c| (c.post_id, c.count.max(0) as u64))
            .collect();

        posts
            .into_iter()
            .map(|model| {
                let post: Post = model.into();
                let author = authors.get(&post.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!("post {} references a missing author", post.id))
                })?;
                Ok(PostCard {
                    author,
                    category: post.category_id.and_then(|id| categories.get(&id).cloned()),
                    location: post.location_id.and_then(|id| locations.get(&id).cloned()),
                    comment_count: counts.get(&post.id).copied().unwrap_or(0),
                    post,
                })
            })
            .collect()
    }
}

/// The post listing for `query`, newest first. A visibility cutoff joins the
/// category so its publication flag can be checked.
pub(crate) fn select_posts(query: &PostQuery) -> Select<PostEntity> {
    let mut select = PostEntity::find();

    if let Some(author_id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }
    if let Some(now) = query.visible_at {
        select = select
            .inner_join(CategoryEntity)
            .filter(post::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(now))
            .filter(category::Column::IsPublished.eq(true));
    }

    select
        .order_by_desc(post::Column::PubDate)
        .order_by_desc(post::Column::Id)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_card(&self, id: i64) -> Result<Option<PostCard>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        Ok(self.load_cards(vec![model]).await?.into_iter().next())
    }

    async fn list(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostCard>, RepoError> {
        let paginator = select_posts(query).paginate(self.db.as_ref(), page.per_page);

        let total_items = paginator.num_items().await.map_err(map_db_err)?;
        let models = paginator
            .fetch_page(page.number - 1)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(
            ?query,
            page = page.number,
            total_items,
            fetched = models.len(),
            "Listed posts"
        );

        let cards = self.load_cards(models).await?;
        Ok(Page::new(cards, page, total_items))
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: i64) -> Result<Vec<CommentWithAuthor>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .find_also_related(UserEntity)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("comment {} references a missing author", comment.id))
                })?;
                Ok(CommentWithAuthor {
                    comment: comment.into(),
                    author: author.into(),
                })
            })
            .collect()
    }
}
