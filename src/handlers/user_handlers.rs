use crate::error::AppError;
use crate::models::filters::UserFilters;
use crate::models::user::User;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
struct UsersTemplate {
    users: Vec<User>,
    filters: UserFilters,
    total: i64,
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(filters): Query<UserFilters>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_service.list_users(&filters).await?;
    let total = state.user_service.count_users(&filters.search).await?;

    Ok(UsersTemplate {
        users,
        filters,
        total,
    })
}
