pub mod auth_handlers;
pub mod client_handlers;
pub mod dashboard_handlers;
pub mod employment_handlers;
pub mod user_handlers;

pub use auth_handlers::{
    login_page, logout, password_login, request_magic_link, verify_magic_link,
};
pub use client_handlers::{create_client, delete_client, list_clients, update_client};
pub use dashboard_handlers::{admin_dashboard, dashboard};
pub use employment_handlers::{
    create_employment, delete_employment, employment_detail, list_employments, my_employments,
    update_employment,
};
pub use user_handlers::list_users;
