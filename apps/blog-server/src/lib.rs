//! # Blogicum server
//!
//! Server-rendered blog on actix-web: listings, post and comment pages,
//! profiles and sign-in. The binary in `main.rs` wires configuration and
//! telemetry around [`app`]; the integration tests build the same app over
//! the in-memory store.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;
pub mod templates;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, web};
use tracing_actix_web::TracingLogger;

pub use config::AppConfig;
pub use state::{AppState, Repositories};
pub use templates::Templates;

use middleware::error::error_pages;
use observability::RequestIdMiddleware;

/// Build the application around `state`.
pub fn app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(error_pages())
        .wrap(TracingLogger::default())
        .wrap(RequestIdMiddleware)
        .app_data(web::Data::new(state))
        .configure(handlers::configure_routes)
        .default_service(web::to(handlers::not_found))
}
