//! Error handling - RFC 7807 bodies and the HTML error pages.

use actix_web::body::EitherBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, ResponseError, web};

use blogicum_core::error::{DomainError, RepoError};
use blogicum_shared::ErrorResponse;

use crate::observability::RequestId;
use crate::state::AppState;
use crate::templates::base_context;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Replace 404 and 500 bodies with the rendered error pages.
pub fn error_pages<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found_page)
        .handler(StatusCode::INTERNAL_SERVER_ERROR, internal_error_page)
}

fn not_found_page<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    Ok(ErrorHandlerResponse::Response(render_error_page(
        res,
        "pages/404.html",
        ErrorResponse::not_found("The page you requested does not exist."),
    )))
}

fn internal_error_page<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    Ok(ErrorHandlerResponse::Response(render_error_page(
        res,
        "pages/500.html",
        ErrorResponse::internal_error(),
    )))
}

fn render_error_page<B>(
    res: ServiceResponse<B>,
    template: &str,
    error: ErrorResponse,
) -> ServiceResponse<EitherBody<B>> {
    let (req, original) = res.into_parts();
    let status = original.status();

    let error = match request_id(&req) {
        Some(id) => error.with_request_id(id),
        None => error,
    }
    .with_instance(req.path());

    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        return ServiceResponse::new(req, original).map_into_left_body();
    };

    let mut context = base_context(None);
    context.insert("error", &error);

    let rendered = state.templates.render(template, &context);
    match rendered {
        Ok(body) => {
            let response = HttpResponse::build(status)
                .content_type("text/html; charset=utf-8")
                .body(body);
            ServiceResponse::new(req, response).map_into_right_body()
        }
        Err(e) => {
            tracing::error!(template, error = %e, "Failed to render error page");
            ServiceResponse::new(req, original).map_into_left_body()
        }
    }
}

fn request_id(req: &HttpRequest) -> Option<String> {
    req.extensions()
        .get::<RequestId>()
        .map(|id| id.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entity_is_not_found() {
        let err = AppError::from(DomainError::not_found("post", 7));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Not found: post 7 not found");
    }

    #[test]
    fn test_repository_failures_map_to_status() {
        assert_eq!(
            AppError::from(RepoError::Constraint("username".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(RepoError::Query("syntax".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(RepoError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }
}
