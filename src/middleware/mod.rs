pub mod csrf;

pub use csrf::{
    generate_csrf_token, get_or_create_csrf_token, validate_csrf_form_field, CsrfToken,
    CSRF_TOKEN_KEY,
};
