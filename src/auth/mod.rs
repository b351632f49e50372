pub mod flash;
pub mod middleware;
pub mod policy;
pub mod signed_url;

use crate::error::AppError;
use crate::models::user::AuthedUser;
use crate::AppState;
use tower_sessions::Session;

pub const SESSION_USER_KEY: &str = "user_id";

/// Greeting shown after login. Admin wins over employee when both roles are
/// attached.
pub fn greeting_for(user: &AuthedUser) -> String {
    if user.is_admin() {
        format!("Hello, {}", user.name())
    } else if user.is_employee() {
        format!("Hi, {}", user.name())
    } else {
        format!("Welcome, {}", user.name())
    }
}

pub fn dashboard_path(user: &AuthedUser) -> &'static str {
    if user.is_admin() {
        "/admin/dashboard"
    } else {
        "/dashboard"
    }
}

/// Resolve the authenticated user (with roles) for the current session.
pub async fn current_user(state: &AppState, session: &Session) -> Result<AuthedUser, AppError> {
    let user_id = session
        .get::<i64>(SESSION_USER_KEY)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    state
        .auth_service
        .authed_user(user_id)
        .await
        .map_err(|_| AppError::Unauthenticated)
}

/// Log a user in: regenerate the session id before binding the identity to
/// it. Both the password and the magic-link flow go through here.
pub async fn establish_session(session: &Session, user: &AuthedUser) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user.id()).await?;
    session.insert("name", user.name().to_string()).await?;
    session
        .insert("auth_timestamp", chrono::Utc::now().timestamp())
        .await?;
    Ok(())
}
