//! # Blogicum Core
//!
//! The domain layer of the Blogicum blog.
//! Records, visibility rules, post queries, ownership guards, pagination and
//! form validation live here with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod guard;
pub mod pagination;
pub mod ports;
pub mod query;

pub use error::DomainError;
