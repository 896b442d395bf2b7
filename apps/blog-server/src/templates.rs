//! Tera template loading and rendering.

use std::path::Path;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use tera::{Context, Tera};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};

/// Compiled page templates.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compile every `*.html` file under `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, tera::Error> {
        let pattern = dir.as_ref().join("**").join("*.html");
        let tera = Tera::new(&pattern.to_string_lossy())?;

        tracing::info!(
            templates = tera.get_template_names().count(),
            dir = %dir.as_ref().display(),
            "Templates loaded"
        );

        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> AppResult<String> {
        self.tera.render(name, context).map_err(|e| {
            AppError::Internal(format!("failed to render {}: {:?}", name, e))
        })
    }

    /// Render `name` into an HTML response with `status`.
    pub fn page(&self, status: StatusCode, name: &str, context: &Context) -> AppResult<HttpResponse> {
        let body = self.render(name, context)?;
        Ok(HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body))
    }

    /// Render `name` with `200 OK`.
    pub fn ok(&self, name: &str, context: &Context) -> AppResult<HttpResponse> {
        self.page(StatusCode::OK, name, context)
    }
}

/// The context every page starts from: who is signed in, if anyone.
pub fn base_context(identity: Option<&Identity>) -> Context {
    let mut context = Context::new();
    context.insert("current_user", &identity);
    context
}
