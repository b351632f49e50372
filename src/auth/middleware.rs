use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::AppState;

pub async fn require_auth(session: Session, request: Request, next: Next) -> Response {
    if let Ok(Some(_user_id)) = session.get::<i64>(super::SESSION_USER_KEY).await {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}

/// Server-side gate for `/admin` routes: the role check happens here, not
/// just in the post-login redirect.
pub async fn require_admin(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    match super::current_user(&state, &session).await {
        Ok(user) if user.is_admin() => next.run(request).await,
        Ok(_) => StatusCode::FORBIDDEN.into_response(),
        Err(_) => Redirect::to("/login").into_response(),
    }
}

pub async fn redirect_if_authenticated(session: Session, request: Request, next: Next) -> Response {
    if let Ok(Some(_user_id)) = session.get::<i64>(super::SESSION_USER_KEY).await {
        Redirect::to("/dashboard").into_response()
    } else {
        next.run(request).await
    }
}
