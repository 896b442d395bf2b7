//! Registration, login and logout.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use blogicum_core::domain::{NewUser, User};
use blogicum_core::error::RepoError;
use blogicum_core::forms::{FormErrors, LoginForm, RegistrationForm};
use blogicum_core::ports::{BaseRepository, UserRepository};

use super::{profile_url, see_other};
use crate::middleware::auth::{OptionalIdentity, removal_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::templates::base_context;

const USERNAME_TAKEN: &str = "A user with that username already exists.";
const BAD_CREDENTIALS: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Issue a session token for `user` and redirect to `location` with the cookie set.
pub(super) fn sign_in(
    state: &AppState,
    user: &User,
    location: impl AsRef<str>,
) -> AppResult<HttpResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let mut response = see_other(location);
    response
        .add_cookie(&session_cookie(token, state.tokens.expiration_seconds()))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

fn render_registration(
    state: &AppState,
    identity: &OptionalIdentity,
    form: &RegistrationForm,
    errors: &FormErrors,
    status: StatusCode,
) -> AppResult<HttpResponse> {
    let mut context = base_context(identity.identity());
    context.insert("form", form);
    context.insert("errors", errors);
    state
        .templates
        .page(status, "registration/registration_form.html", &context)
}

/// GET /auth/registration/
pub async fn registration_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    render_registration(
        &state,
        &identity,
        &RegistrationForm::default(),
        &FormErrors::new(),
        StatusCode::OK,
    )
}

/// POST /auth/registration/
pub async fn register(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<RegistrationForm>,
) -> AppResult<HttpResponse> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return render_registration(
                &state,
                &identity,
                &form,
                &errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
    };

    if state.users.find_by_username(&input.username).await?.is_some() {
        let errors = FormErrors::single("username", USERNAME_TAKEN);
        return render_registration(
            &state,
            &identity,
            &form,
            &errors,
            StatusCode::UNPROCESSABLE_ENTITY,
        );
    }

    let password_hash = state
        .passwords
        .hash(&input.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = match state
        .users
        .create(NewUser::new(input.username, input.email, password_hash))
        .await
    {
        Ok(user) => user,
        Err(RepoError::Constraint(_)) => {
            let errors = FormErrors::single("username", USERNAME_TAKEN);
            return render_registration(
                &state,
                &identity,
                &form,
                &errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    sign_in(&state, &user, profile_url(&user.username))
}

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

fn render_login(
    state: &AppState,
    identity: &OptionalIdentity,
    form: &LoginForm,
    errors: &FormErrors,
    status: StatusCode,
) -> AppResult<HttpResponse> {
    let mut context = base_context(identity.identity());
    context.insert("form", form);
    context.insert("errors", errors);
    state.templates.page(status, "registration/login.html", &context)
}

/// GET /auth/login/
pub async fn login_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<NextQuery>,
) -> AppResult<HttpResponse> {
    let form = LoginForm {
        next: query.into_inner().next,
        ..LoginForm::default()
    };
    render_login(&state, &identity, &form, &FormErrors::new(), StatusCode::OK)
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            return render_login(&state, &identity, &form, &errors, StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    let user = match state.users.find_by_username(&input.username).await? {
        Some(user) => user,
        None => {
            tracing::info!(username = %input.username, "Login failed: unknown user");
            let errors = FormErrors::single(FormErrors::NON_FIELD, BAD_CREDENTIALS);
            return render_login(&state, &identity, &form, &errors, StatusCode::UNPROCESSABLE_ENTITY);
        }
    };

    let valid = state
        .passwords
        .verify(&input.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        let errors = FormErrors::single(FormErrors::NON_FIELD, BAD_CREDENTIALS);
        return render_login(&state, &identity, &form, &errors, StatusCode::UNPROCESSABLE_ENTITY);
    }

    tracing::info!(user_id = user.id, "User logged in");
    sign_in(&state, &user, form.safe_next())
}

/// POST /auth/logout/
pub async fn logout() -> HttpResponse {
    let mut response = see_other("/");
    if let Err(e) = response.add_cookie(&removal_cookie()) {
        tracing::error!(error = %e, "Failed to clear session cookie");
    }
    response
}
