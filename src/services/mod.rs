pub mod auth_service;
pub mod client_service;
pub mod email_service;
pub mod employment_service;
pub mod magic_link_service;
pub mod user_service;

pub use auth_service::{AuthService, LoginRequest};
pub use client_service::ClientService;
pub use email_service::{create_email_service, EmailService, MockEmailService, SmtpEmailService};
pub use employment_service::EmploymentService;
pub use magic_link_service::MagicLinkService;
pub use user_service::UserService;
