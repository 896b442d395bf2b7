//! Static pages.

use actix_web::{HttpResponse, web};

use blogicum_core::DomainError;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates::base_context;

/// GET /pages/about/
pub async fn about(state: web::Data<AppState>, identity: OptionalIdentity) -> AppResult<HttpResponse> {
    state
        .templates
        .ok("pages/about.html", &base_context(identity.identity()))
}

/// GET /pages/rules/
pub async fn rules(state: web::Data<AppState>, identity: OptionalIdentity) -> AppResult<HttpResponse> {
    state
        .templates
        .ok("pages/rules.html", &base_context(identity.identity()))
}

/// Default service; the error page middleware renders the body.
pub async fn not_found(req: actix_web::HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::from(DomainError::not_found("page", req.path())))
}
