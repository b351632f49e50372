use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::role::{self, Role};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

/// A user together with their attached roles, as loaded for the current
/// request. Role checks are independent membership tests; a user may hold
/// both roles at once.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user: User,
    pub roles: Vec<Role>,
}

impl AuthedUser {
    pub fn new(user: User, roles: Vec<Role>) -> Self {
        Self { user, roles }
    }

    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn name(&self) -> &str {
        &self.user.name
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(role::ADMIN)
    }

    pub fn is_employee(&self) -> bool {
        self.has_role(role::EMPLOYEE)
    }

    fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: "2026-01-01 00:00:00".to_string(),
        }
    }

    fn role(id: i64, name: &str) -> Role {
        Role {
            id,
            name: name.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn role_checks_are_independent() {
        let nobody = AuthedUser::new(user(), vec![]);
        assert!(!nobody.is_admin());
        assert!(!nobody.is_employee());

        let admin = AuthedUser::new(user(), vec![role(1, "admin")]);
        assert!(admin.is_admin());
        assert!(!admin.is_employee());

        let both = AuthedUser::new(user(), vec![role(1, "admin"), role(2, "employee")]);
        assert!(both.is_admin());
        assert!(both.is_employee());
    }
}
