//! Observability - request IDs threaded through logs and error pages.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware};
