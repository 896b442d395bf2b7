//! Post listings, detail and the author's create/edit/delete pages.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use tera::Context;

use blogicum_core::DomainError;
use blogicum_core::domain::Post;
use blogicum_core::forms::{CommentForm, FormErrors, PostForm, PostInput};
use blogicum_core::guard::{Guarded, guard_post};
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
};
use blogicum_core::query::{PostQuery, is_visible_to};
use blogicum_shared::Choice;

use super::{PageQuery, current_user, page_view, post_url, profile_url, see_other};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates::base_context;

/// GET /
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let request = query.request()?;
    let page = state.posts.list(&PostQuery::published(Utc::now()), request).await?;

    let mut context = base_context(identity.identity());
    context.insert("page_obj", &page_view(page)?);
    state.templates.ok("blog/index.html", &context)
}

/// GET /category/{slug}/
pub async fn category(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = state
        .categories
        .find_published_by_slug(&slug)
        .await?
        .ok_or_else(|| DomainError::not_found("category", &slug))?;

    let request = query.request()?;
    let page = state
        .posts
        .list(&PostQuery::published(Utc::now()).in_category(category.id), request)
        .await?;

    let mut context = base_context(identity.identity());
    context.insert("category", &category);
    context.insert("page_obj", &page_view(page)?);
    state.templates.ok("blog/category.html", &context)
}

/// GET /posts/{post_id}/
///
/// Unpublished, scheduled and uncategorised posts are shown to their
/// author only; everyone else gets a 404.
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let card = state
        .posts
        .find_card(post_id)
        .await?
        .filter(|card| {
            is_visible_to(&card.post, card.category.as_ref(), identity.user_id(), Utc::now())
        })
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    let comments = state.comments.list_for_post(post_id).await?;

    let mut context = base_context(identity.identity());
    context.insert("post", &card);
    context.insert("comments", &comments);
    context.insert("form", &CommentForm::default());
    context.insert("errors", &FormErrors::new());
    state.templates.ok("blog/detail.html", &context)
}

/// What the shared post form page is being used for.
#[derive(Debug, Clone, Copy)]
enum FormMode {
    Create,
    Edit,
    Delete,
}

impl FormMode {
    fn as_str(self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit => "edit",
            FormMode::Delete => "delete",
        }
    }
}

async fn render_form(
    state: &AppState,
    identity: &Identity,
    mode: FormMode,
    post_id: Option<i64>,
    form: &PostForm,
    errors: &FormErrors,
    status: StatusCode,
) -> AppResult<HttpResponse> {
    let categories: Vec<Choice> = state
        .categories
        .list_all()
        .await?
        .into_iter()
        .map(|c| Choice::new(c.id, c.title))
        .collect();
    let locations: Vec<Choice> = state
        .locations
        .list_all()
        .await?
        .into_iter()
        .map(|l| Choice::new(l.id, l.name))
        .collect();

    let mut context: Context = base_context(Some(identity));
    context.insert("mode", mode.as_str());
    context.insert("post_id", &post_id);
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("categories", &categories);
    context.insert("locations", &locations);
    state.templates.page(status, "blog/create.html", &context)
}

/// Field rules, then the category and location must exist.
async fn validate_form(state: &AppState, form: &PostForm) -> AppResult<Result<PostInput, FormErrors>> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return Ok(Err(errors)),
    };

    let mut errors = FormErrors::new();
    if let Some(id) = input.category_id {
        if state.categories.find_by_id(id).await?.is_none() {
            errors.add("category", INVALID_CHOICE);
        }
    }
    if let Some(id) = input.location_id {
        if state.locations.find_by_id(id).await?.is_none() {
            errors.add("location", INVALID_CHOICE);
        }
    }
    Ok(errors.finish(|| input))
}

const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// GET /posts/create/
pub async fn create_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    render_form(
        &state,
        &identity,
        FormMode::Create,
        None,
        &PostForm::blank(),
        &FormErrors::new(),
        StatusCode::OK,
    )
    .await
}

/// POST /posts/create/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let input = match validate_form(&state, &form).await? {
        Ok(input) => input,
        Err(errors) => {
            return render_form(
                &state,
                &identity,
                FormMode::Create,
                None,
                &form,
                &errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    let author = current_user(&state, &identity).await?;
    let post = state.posts.create(input.into_new_post(author.id)).await?;
    tracing::info!(post_id = post.id, author_id = author.id, "Post created");

    Ok(see_other(profile_url(&author.username)))
}

/// Load the post and let only its author through.
async fn owned_post(
    state: &AppState,
    identity: &Identity,
    post_id: i64,
) -> AppResult<Guarded<Post>> {
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;
    Ok(guard_post(post, Some(identity.user_id)))
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = match owned_post(&state, &identity, path.into_inner()).await? {
        Guarded::Proceed(post) => post,
        Guarded::RedirectToPost(id) => return Ok(see_other(post_url(id))),
    };

    render_form(
        &state,
        &identity,
        FormMode::Edit,
        Some(post.id),
        &PostForm::from_post(&post),
        &FormErrors::new(),
        StatusCode::OK,
    )
    .await
}

/// POST /posts/{post_id}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let mut post = match owned_post(&state, &identity, path.into_inner()).await? {
        Guarded::Proceed(post) => post,
        Guarded::RedirectToPost(id) => return Ok(see_other(post_url(id))),
    };

    let form = form.into_inner();
    let input = match validate_form(&state, &form).await? {
        Ok(input) => input,
        Err(errors) => {
            return render_form(
                &state,
                &identity,
                FormMode::Edit,
                Some(post.id),
                &form,
                &errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    input.apply_to(&mut post);
    let post = state.posts.update(post).await?;
    tracing::info!(post_id = post.id, "Post updated");

    Ok(see_other(post_url(post.id)))
}

/// GET /posts/{post_id}/delete/
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = match owned_post(&state, &identity, path.into_inner()).await? {
        Guarded::Proceed(post) => post,
        Guarded::RedirectToPost(id) => return Ok(see_other(post_url(id))),
    };

    render_form(
        &state,
        &identity,
        FormMode::Delete,
        Some(post.id),
        &PostForm::from_post(&post),
        &FormErrors::new(),
        StatusCode::OK,
    )
    .await
}

/// POST /posts/{post_id}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = match owned_post(&state, &identity, path.into_inner()).await? {
        Guarded::Proceed(post) => post,
        Guarded::RedirectToPost(id) => return Ok(see_other(post_url(id))),
    };

    let author = current_user(&state, &identity).await?;
    state.posts.delete(post.id).await?;
    tracing::info!(post_id = post.id, "Post deleted");

    Ok(see_other(profile_url(&author.username)))
}
