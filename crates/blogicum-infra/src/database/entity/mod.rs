//! SeaORM entities, one module per table.

use sea_orm::EntityTrait;

pub mod category;
pub mod comment;
pub mod location;
pub mod post;
pub mod user;

/// Ties a table to the domain record it stores and the draft that creates it.
pub trait DomainEntity: EntityTrait {
    type Record: From<Self::Model> + Into<Self::ActiveModel> + Send + Sync + 'static;
    type Draft: Into<Self::ActiveModel> + Send + Sync + 'static;
}
