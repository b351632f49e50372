use crate::auth::policy::{authorize, Action, EmploymentPolicy};
use crate::auth::{self, flash};
use crate::error::AppError;
use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::models::employment::{EmploymentDetail, EmploymentForm};
use crate::models::filters::EmploymentFilters;
use crate::services::employment_service::EmploymentServiceError;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tower_sessions::Session;

use super::client_handlers::DeleteForm;

#[derive(Template, WebTemplate)]
#[template(path = "admin/employments.html")]
struct AdminEmploymentsTemplate {
    employments: Vec<EmploymentDetail>,
    filters: EmploymentFilters,
    total: i64,
    status: Option<String>,
    csrf_token: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "employments.html")]
struct MyEmploymentsTemplate {
    user_name: String,
    employments: Vec<EmploymentDetail>,
}

#[derive(Template, WebTemplate)]
#[template(path = "employment_detail.html")]
struct EmploymentDetailTemplate {
    employment: EmploymentDetail,
}

/// GET /admin/employments
pub async fn list_employments(
    State(state): State<AppState>,
    session: Session,
    Query(filters): Query<EmploymentFilters>,
) -> Result<Response, AppError> {
    let user = auth::current_user(&state, &session).await?;
    authorize(user.is_admin())?;

    let employments = state.employment_service.list(&filters).await?;
    let total = state.employment_service.count(&filters.search).await?;
    let status = flash::take(&session, flash::STATUS).await;
    let csrf_token = get_or_create_csrf_token(&session).await?;

    Ok(AdminEmploymentsTemplate {
        employments,
        filters,
        total,
        status,
        csrf_token,
    }
    .into_response())
}

/// POST /admin/employments
pub async fn create_employment(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<EmploymentForm>,
) -> Result<Response, AppError> {
    validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .map_err(|_| AppError::Forbidden)?;

    let user = auth::current_user(&state, &session).await?;
    authorize(EmploymentPolicy::allows(&user, Action::Create, None))?;

    match state.employment_service.create(&form).await {
        Ok(_) => flash::put(&session, flash::STATUS, "Employment created.").await?,
        Err(e @ EmploymentServiceError::InvalidStatus(_))
        | Err(e @ EmploymentServiceError::UnknownReference) => {
            flash::put(&session, flash::STATUS, &e.to_string()).await?
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/employments").into_response())
}

/// POST /admin/employments/{id}
pub async fn update_employment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<EmploymentForm>,
) -> Result<Response, AppError> {
    validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .map_err(|_| AppError::Forbidden)?;

    let user = auth::current_user(&state, &session).await?;
    let employment = state.employment_service.find(id).await?;
    authorize(EmploymentPolicy::allows(
        &user,
        Action::Update,
        Some(&employment),
    ))?;

    match state.employment_service.update(id, &form).await {
        Ok(()) => flash::put(&session, flash::STATUS, "Employment updated.").await?,
        Err(e @ EmploymentServiceError::InvalidStatus(_))
        | Err(e @ EmploymentServiceError::UnknownReference) => {
            flash::put(&session, flash::STATUS, &e.to_string()).await?
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/employments").into_response())
}

/// POST /admin/employments/{id}/delete
pub async fn delete_employment(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .map_err(|_| AppError::Forbidden)?;

    let user = auth::current_user(&state, &session).await?;
    let employment = state.employment_service.find(id).await?;
    authorize(EmploymentPolicy::allows(
        &user,
        Action::Delete,
        Some(&employment),
    ))?;

    state.employment_service.delete(id).await?;
    flash::put(&session, flash::STATUS, "Employment deleted.").await?;

    Ok(Redirect::to("/admin/employments").into_response())
}

/// GET /employments - the signed-in user's own records, whatever their role.
pub async fn my_employments(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let user = auth::current_user(&state, &session).await?;
    authorize(EmploymentPolicy::allows(&user, Action::ViewAny, None))?;

    let employments = state.employment_service.list_for_user(user.id()).await?;

    Ok(MyEmploymentsTemplate {
        user_name: user.name().to_string(),
        employments,
    }
    .into_response())
}

/// GET /employments/{id}
pub async fn employment_detail(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let user = auth::current_user(&state, &session).await?;
    let employment = state.employment_service.find(id).await?;
    authorize(EmploymentPolicy::allows(
        &user,
        Action::View,
        Some(&employment),
    ))?;

    let employment = state.employment_service.find_detail(id).await?;

    Ok(EmploymentDetailTemplate { employment }.into_response())
}
