pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod version;

// Shared fixtures for unit and integration tests.
pub mod test_utils;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<services::auth_service::AuthService>,
    pub user_service: Arc<services::user_service::UserService>,
    pub magic_link_service: Arc<services::magic_link_service::MagicLinkService>,
    pub client_service: Arc<services::client_service::ClientService>,
    pub employment_service: Arc<services::employment_service::EmploymentService>,
    pub pool: sqlx::SqlitePool,
}
