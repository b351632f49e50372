use crate::error::AppError;
use crate::models::employment::Employment;
use crate::models::user::AuthedUser;

/// CRUD-style actions a policy can gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewAny,
    View,
    Create,
    Update,
    Delete,
    Restore,
    ForceDelete,
}

/// Clients are admin-only, every action.
pub struct ClientPolicy;

impl ClientPolicy {
    pub fn allows(user: &AuthedUser, _action: Action) -> bool {
        user.is_admin()
    }
}

/// Admins get every action; employees may only list and view their own
/// employment rows. Anything not explicitly allowed is denied.
pub struct EmploymentPolicy;

impl EmploymentPolicy {
    pub fn allows(user: &AuthedUser, action: Action, employment: Option<&Employment>) -> bool {
        if user.is_admin() {
            return true;
        }

        match action {
            Action::ViewAny => user.is_employee(),
            Action::View => {
                user.is_employee() && employment.is_some_and(|e| e.user_id == user.id())
            }
            _ => false,
        }
    }
}

/// The gate requires an explicit `true`; everything else surfaces as a
/// generic forbidden response.
pub fn authorize(allowed: bool) -> Result<(), AppError> {
    if allowed {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
