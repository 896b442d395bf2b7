//! Profile pages.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::DomainError;
use blogicum_core::error::RepoError;
use blogicum_core::forms::{FormErrors, ProfileEditForm};
use blogicum_core::ports::{BaseRepository, PostRepository, UserRepository};
use blogicum_core::query::PostQuery;

use super::auth::sign_in;
use super::{PageQuery, current_user, page_view, profile_url};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::templates::base_context;

const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// GET /profile/{username}/
///
/// The owner sees all of their posts, drafts and scheduled ones included;
/// other visitors see the published ones.
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", &username))?;

    let request = query.request()?;
    let posts_query = PostQuery::for_profile(user.id, identity.user_id(), Utc::now());
    let page = state.posts.list(&posts_query, request).await?;

    let mut context = base_context(identity.identity());
    context.insert("profile", &user);
    context.insert("page_obj", &page_view(page)?);
    state.templates.ok("blog/profile.html", &context)
}

fn render_form(
    state: &AppState,
    identity: &Identity,
    form: &ProfileEditForm,
    errors: &FormErrors,
    status: StatusCode,
) -> AppResult<HttpResponse> {
    let mut context = base_context(Some(identity));
    context.insert("form", form);
    context.insert("errors", errors);
    state.templates.page(status, "blog/user.html", &context)
}

/// GET /profile/edit/
pub async fn edit_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = current_user(&state, &identity).await?;
    render_form(
        &state,
        &identity,
        &ProfileEditForm::from_user(&user),
        &FormErrors::new(),
        StatusCode::OK,
    )
}

/// POST /profile/edit/
///
/// A changed username invalidates the session token, so a fresh one is
/// issued with the redirect.
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<ProfileEditForm>,
) -> AppResult<HttpResponse> {
    let mut user = current_user(&state, &identity).await?;

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return render_form(&state, &identity, &form, &errors, StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    if let Some(other) = state.users.find_by_username(&input.username).await? {
        if other.id != user.id {
            let errors = FormErrors::single("username", USERNAME_TAKEN);
            return render_form(&state, &identity, &form, &errors, StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    input.apply_to(&mut user);
    let user = match state.users.update(user).await {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            let errors = FormErrors::single("username", USERNAME_TAKEN);
            return render_form(&state, &identity, &form, &errors, StatusCode::UNPROCESSABLE_ENTITY);
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = user.id, "Profile updated");

    sign_in(&state, &user, profile_url(&user.username))
}
