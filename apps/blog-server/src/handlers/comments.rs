//! Comment create/edit/delete pages.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use blogicum_core::DomainError;
use blogicum_core::domain::{Comment, NewComment};
use blogicum_core::forms::{CommentForm, FormErrors};
use blogicum_core::guard::{Guarded, guard_comment};
use blogicum_core::ports::BaseRepository;

use super::{post_url, see_other};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates::base_context;

/// The comment page: `comment` is set when editing or deleting.
fn render(
    state: &AppState,
    identity: Option<&Identity>,
    post_id: i64,
    comment: Option<&Comment>,
    form: &CommentForm,
    errors: &FormErrors,
    status: StatusCode,
) -> AppResult<HttpResponse> {
    let mut context = base_context(identity);
    context.insert("post_id", &post_id);
    context.insert("comment", &comment);
    context.insert("mode", if comment.is_some() { "edit" } else { "create" });
    context.insert("form", form);
    context.insert("errors", errors);
    state.templates.page(status, "blog/comment.html", &context)
}

async fn ensure_post(state: &AppState, post_id: i64) -> AppResult<()> {
    state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;
    Ok(())
}

/// GET /posts/{post_id}/comment/
pub async fn create_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    ensure_post(&state, post_id).await?;

    render(
        &state,
        Some(&identity),
        post_id,
        None,
        &CommentForm::default(),
        &FormErrors::new(),
        StatusCode::OK,
    )
}

/// POST /posts/{post_id}/comment/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    ensure_post(&state, post_id).await?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return render(
                &state,
                Some(&identity),
                post_id,
                None,
                &form,
                &errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    let comment = state
        .comments
        .create(NewComment::new(post_id, identity.user_id, input.text))
        .await?;
    tracing::info!(comment_id = comment.id, post_id, "Comment created");

    Ok(see_other(post_url(post_id)))
}

/// Load the comment under `post_id` and let only its author through.
async fn owned_comment(
    state: &AppState,
    identity: &OptionalIdentity,
    post_id: i64,
    comment_id: i64,
) -> AppResult<Guarded<Comment>> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or_else(|| DomainError::not_found("comment", comment_id))?;
    Ok(guard_comment(comment, post_id, identity.user_id())?)
}

/// GET /posts/{post_id}/comment/{comment_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = match owned_comment(&state, &identity, post_id, comment_id).await? {
        Guarded::Proceed(comment) => comment,
        Guarded::RedirectToPost(id) => return Ok(see_other(post_url(id))),
    };

    render(
        &state,
        identity.identity(),
        post_id,
        Some(&comment),
        &CommentForm::from_comment(&comment),
        &FormErrors::new(),
        StatusCode::OK,
    )
}

/// POST /posts/{post_id}/comment/{comment_id}/edit/
pub async fn edit(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(i64, i64)>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let mut comment = match owned_comment(&state, &identity, post_id, comment_id).await? {
        Guarded::Proceed(comment) => comment,
        Guarded::RedirectToPost(id) => return Ok(see_other(post_url(id))),
    };

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return render(
                &state,
                identity.identity(),
                post_id,
                Some(&comment),
                &form,
                &errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    comment.text = input.text;
    state.comments.update(comment).await?;
    tracing::info!(comment_id, post_id, "Comment updated");

    Ok(see_other(post_url(post_id)))
}

/// GET /posts/{post_id}/comment/{comment_id}/delete/
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = match owned_comment(&state, &identity, post_id, comment_id).await? {
        Guarded::Proceed(comment) => comment,
        Guarded::RedirectToPost(id) => return Ok(see_other(post_url(id))),
    };

    let mut context = base_context(identity.identity());
    context.insert("post_id", &post_id);
    context.insert("comment", &comment);
    context.insert("mode", "delete");
    state.templates.ok("blog/comment.html", &context)
}

/// POST /posts/{post_id}/comment/{comment_id}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<(i64, i64)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    if let Guarded::RedirectToPost(id) = owned_comment(&state, &identity, post_id, comment_id).await? {
        return Ok(see_other(post_url(id)));
    }

    state.comments.delete(comment_id).await?;
    tracing::info!(comment_id, post_id, "Comment deleted");

    Ok(see_other(post_url(post_id)))
}
