//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod pages;
mod posts;
mod profile;

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use blogicum_core::DomainError;
use blogicum_core::domain::{PostCard, User};
use blogicum_core::pagination::{POSTS_PER_PAGE, Page, PageRequest};
use blogicum_core::ports::BaseRepository;
use blogicum_shared::PageView;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/posts")
                .route("/create/", web::get().to(posts::create_form))
                .route("/create/", web::post().to(posts::create))
                .route("/{post_id}/", web::get().to(posts::detail))
                .route("/{post_id}/edit/", web::get().to(posts::edit_form))
                .route("/{post_id}/edit/", web::post().to(posts::edit))
                .route("/{post_id}/delete/", web::get().to(posts::delete_form))
                .route("/{post_id}/delete/", web::post().to(posts::delete))
                .route("/{post_id}/comment/", web::get().to(comments::create_form))
                .route("/{post_id}/comment/", web::post().to(comments::create))
                .route(
                    "/{post_id}/comment/{comment_id}/edit/",
                    web::get().to(comments::edit_form),
                )
                .route(
                    "/{post_id}/comment/{comment_id}/edit/",
                    web::post().to(comments::edit),
                )
                .route(
                    "/{post_id}/comment/{comment_id}/delete/",
                    web::get().to(comments::delete_form),
                )
                .route(
                    "/{post_id}/comment/{comment_id}/delete/",
                    web::post().to(comments::delete),
                ),
        )
        .route("/category/{slug}/", web::get().to(posts::category))
        .route("/profile/edit/", web::get().to(profile::edit_form))
        .route("/profile/edit/", web::post().to(profile::edit))
        .route("/profile/{username}/", web::get().to(profile::profile))
        .service(
            web::scope("/auth")
                .wrap(RateLimitMiddleware)
                .route("/registration/", web::get().to(auth::registration_form))
                .route("/registration/", web::post().to(auth::register))
                .route("/login/", web::get().to(auth::login_form))
                .route("/login/", web::post().to(auth::login))
                .route("/logout/", web::post().to(auth::logout)),
        )
        .service(
            web::scope("/pages")
                .route("/about/", web::get().to(pages::about))
                .route("/rules/", web::get().to(pages::rules)),
        );
}

/// Fallback for unmatched routes.
pub use pages::not_found;

/// `303 See Other` to `location`.
pub(crate) fn see_other(location: impl AsRef<str>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.as_ref()))
        .finish()
}

pub(crate) fn post_url(post_id: i64) -> String {
    format!("/posts/{}/", post_id)
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{}/", username)
}

/// The requester's stored record. The token's username can be stale after a
/// rename, so anything that links to the requester goes through this.
pub(crate) async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| DomainError::not_found("user", identity.user_id).into())
}

/// `?page=N` on listings.
#[derive(Debug, Deserialize)]
pub(crate) struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> AppResult<PageRequest> {
        Ok(PageRequest::parse(self.page.as_deref(), POSTS_PER_PAGE)?)
    }
}

/// Check the page exists and shape it for the templates.
pub(crate) fn page_view(page: Page<PostCard>) -> AppResult<PageView<PostCard>> {
    let page = page.ensure_exists()?;
    let num_pages = page.num_pages();
    Ok(PageView::new(page.items, page.number, num_pages, page.total_items))
}
