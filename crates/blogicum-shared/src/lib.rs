//! # Blogicum Shared
//!
//! View types handed to templates and JSON endpoints.

pub mod response;
pub mod view;

pub use response::{ErrorResponse, HealthResponse};
pub use view::{Choice, PageView};
