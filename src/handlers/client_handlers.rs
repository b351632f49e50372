use crate::auth::policy::{authorize, Action, ClientPolicy};
use crate::auth::{self, flash};
use crate::error::AppError;
use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::models::client::{Client, ClientForm};
use crate::services::client_service::ClientServiceError;
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "admin/clients.html")]
struct ClientsTemplate {
    clients: Vec<Client>,
    status: Option<String>,
    csrf_token: String,
}

#[derive(Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub csrf_token: String,
}

/// GET /admin/clients
pub async fn list_clients(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let user = auth::current_user(&state, &session).await?;
    authorize(ClientPolicy::allows(&user, Action::ViewAny))?;

    let clients = state.client_service.list_clients().await?;
    let status = flash::take(&session, flash::STATUS).await;
    let csrf_token = get_or_create_csrf_token(&session).await?;

    Ok(ClientsTemplate {
        clients,
        status,
        csrf_token,
    }
    .into_response())
}

/// POST /admin/clients
pub async fn create_client(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ClientForm>,
) -> Result<Response, AppError> {
    validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .map_err(|_| AppError::Forbidden)?;

    let user = auth::current_user(&state, &session).await?;
    authorize(ClientPolicy::allows(&user, Action::Create))?;

    match state.client_service.create_client(&form).await {
        Ok(_) => flash::put(&session, flash::STATUS, "Client created.").await?,
        Err(ClientServiceError::Validation(msg)) => {
            flash::put(&session, flash::STATUS, &msg).await?
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/clients").into_response())
}

/// POST /admin/clients/{id}
pub async fn update_client(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<ClientForm>,
) -> Result<Response, AppError> {
    validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .map_err(|_| AppError::Forbidden)?;

    let user = auth::current_user(&state, &session).await?;
    authorize(ClientPolicy::allows(&user, Action::Update))?;

    match state.client_service.update_client(id, &form).await {
        Ok(()) => flash::put(&session, flash::STATUS, "Client updated.").await?,
        Err(ClientServiceError::Validation(msg)) => {
            flash::put(&session, flash::STATUS, &msg).await?
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/admin/clients").into_response())
}

/// POST /admin/clients/{id}/delete
pub async fn delete_client(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .map_err(|_| AppError::Forbidden)?;

    let user = auth::current_user(&state, &session).await?;
    authorize(ClientPolicy::allows(&user, Action::Delete))?;

    state.client_service.delete_client(id).await?;
    flash::put(&session, flash::STATUS, "Client deleted.").await?;

    Ok(Redirect::to("/admin/clients").into_response())
}
