use crate::auth::{self, flash};
use crate::error::AppError;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    user_name: String,
    greeting: Option<String>,
    is_admin: bool,
}

#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
struct AdminDashboardTemplate {
    user_name: String,
    greeting: Option<String>,
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = auth::current_user(&state, &session).await?;
    let greeting = flash::take(&session, flash::GREETING).await;

    Ok(DashboardTemplate {
        user_name: user.name().to_string(),
        greeting,
        is_admin: user.is_admin(),
    })
}

/// GET /admin/dashboard (admin enforced at the route layer)
pub async fn admin_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let user = auth::current_user(&state, &session).await?;
    let greeting = flash::take(&session, flash::GREETING).await;

    Ok(AdminDashboardTemplate {
        user_name: user.name().to_string(),
        greeting,
    })
}
