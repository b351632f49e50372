use crate::auth::{self, flash};
use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::services::auth_service::LoginRequest;
use crate::services::magic_link_service::MagicLinkError;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

pub const INVALID_CREDENTIALS_MESSAGE: &str =
    "The provided credentials do not match our records.";

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    error: Option<String>,
    status: Option<String>,
    csrf_token: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/link_error.html")]
struct LinkErrorTemplate {
    error: String,
}

#[derive(Deserialize)]
pub struct PasswordLoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct MagicLinkRequestForm {
    pub email: String,
    #[serde(default)]
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct MagicLinkParams {
    pub expires: i64,
    pub signature: String,
}

async fn render_login(session: &Session, error: Option<String>, code: StatusCode) -> Response {
    let status = flash::take(session, flash::STATUS).await;
    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));

    let template = LoginTemplate {
        error,
        status,
        csrf_token,
    };

    (code, template).into_response()
}

/// GET /login
pub async fn login_page(session: Session) -> Response {
    render_login(&session, None, StatusCode::OK).await
}

/// POST /auth/password
pub async fn password_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PasswordLoginForm>,
) -> Response {
    if let Err(code) = validate_csrf_form_field(&session, &form.csrf_token).await {
        return code.into_response();
    }

    let request = LoginRequest {
        email: form.email.trim().to_string(),
        password: form.password,
    };

    let user = match state.auth_service.authenticate(request).await {
        Ok(user) => user,
        Err(_) => {
            // Same message whether the email exists or the password is wrong.
            return render_login(
                &session,
                Some(INVALID_CREDENTIALS_MESSAGE.to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    let authed = match state.auth_service.authed_user(user.id).await {
        Ok(authed) => authed,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    if auth::establish_session(&session, &authed).await.is_err() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let _ = flash::put(&session, flash::GREETING, &auth::greeting_for(&authed)).await;

    Redirect::to(auth::dashboard_path(&authed)).into_response()
}

/// POST /auth/magic-link
pub async fn request_magic_link(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<MagicLinkRequestForm>,
) -> Response {
    if let Err(code) = validate_csrf_form_field(&session, &form.csrf_token).await {
        return code.into_response();
    }

    let email = form.email.trim();
    if email.is_empty() || !email.contains('@') {
        return render_login(
            &session,
            Some("Please enter a valid email address.".to_string()),
            StatusCode::UNPROCESSABLE_ENTITY,
        )
        .await;
    }

    match state.magic_link_service.issue(email).await {
        Ok(_) => {
            let _ = flash::put(&session, flash::STATUS, "We have emailed your login link!").await;
            Redirect::to("/login").into_response()
        }
        Err(MagicLinkError::UserNotFound) => {
            render_login(
                &session,
                Some("We could not find a user with that email address.".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await
        }
        Err(e) => {
            tracing::error!("Failed to issue magic link: {}", e);
            render_login(
                &session,
                Some("Failed to send login link. Please try again.".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .await
        }
    }
}

/// GET /auth/magic-link/{user}
///
/// The link is self-authenticating: the user id and expiry are covered by
/// the HMAC in the query string, so any tampering fails verification.
pub async fn verify_magic_link(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i64>,
    Query(params): Query<MagicLinkParams>,
) -> Response {
    let user = match state
        .magic_link_service
        .verify(user_id, params.expires, &params.signature)
        .await
    {
        Ok(user) => user,
        Err(_) => {
            let template = LinkErrorTemplate {
                error: "This login link is invalid or has expired.".to_string(),
            };
            return (StatusCode::FORBIDDEN, template).into_response();
        }
    };

    let authed = match state.auth_service.authed_user(user.id).await {
        Ok(authed) => authed,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    if auth::establish_session(&session, &authed).await.is_err() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let _ = flash::put(&session, flash::GREETING, &auth::greeting_for(&authed)).await;

    Redirect::to(auth::dashboard_path(&authed)).into_response()
}

/// DELETE /auth/session
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    Redirect::to("/")
}
