use crate::models::user::{AuthedUser, User};
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::user_repository::UserRepository;
use argon2::{password_hash::PasswordHash, Argon2, PasswordVerifier};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] crate::repositories::user_repository::RepositoryError),
}

pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    role_repository: Arc<dyn RoleRepository>,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
        }
    }

    /// Password login. Unknown email and wrong password collapse into the
    /// same error so the response never reveals whether an account exists.
    pub async fn authenticate(&self, request: LoginRequest) -> Result<User, AuthServiceError> {
        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !self.verify_password(&request.password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Load a user together with their attached roles.
    pub async fn authed_user(&self, user_id: i64) -> Result<AuthedUser, AuthServiceError> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        let roles = self.role_repository.roles_for_user(user.id).await?;

        Ok(AuthedUser::new(user, roles))
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Role;
    use crate::repositories::role_repository::MockRoleRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    #[tokio::test]
    async fn unknown_email_yields_invalid_credentials() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_email()
            .with(eq("ghost@example.com"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = AuthService::new(Arc::new(user_repo), Arc::new(MockRoleRepository::new()));

        let result = service
            .authenticate(LoginRequest {
                email: "ghost@example.com".to_string(),
                password: "whatever".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn malformed_stored_hash_yields_invalid_credentials() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_email().times(1).returning(|_| {
            Box::pin(async move {
                Ok(Some(User {
                    id: 1,
                    name: "Broken".to_string(),
                    email: "broken@example.com".to_string(),
                    password_hash: "not-a-phc-string".to_string(),
                    created_at: "2026-01-01 00:00:00".to_string(),
                }))
            })
        });

        let service = AuthService::new(Arc::new(user_repo), Arc::new(MockRoleRepository::new()));

        let result = service
            .authenticate(LoginRequest {
                email: "broken@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthServiceError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn authed_user_carries_roles() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().with(eq(5)).returning(|_| {
            Box::pin(async move {
                Ok(Some(User {
                    id: 5,
                    name: "Lin".to_string(),
                    email: "lin@example.com".to_string(),
                    password_hash: "x".to_string(),
                    created_at: "2026-01-01 00:00:00".to_string(),
                }))
            })
        });

        let mut role_repo = MockRoleRepository::new();
        role_repo
            .expect_roles_for_user()
            .with(eq(5))
            .returning(|_| {
                Box::pin(async move {
                    Ok(vec![Role {
                        id: 2,
                        name: "employee".to_string(),
                        description: String::new(),
                    }])
                })
            });

        let service = AuthService::new(Arc::new(user_repo), Arc::new(role_repo));
        let authed = service.authed_user(5).await.unwrap();

        assert!(authed.is_employee());
        assert!(!authed.is_admin());
    }

    #[tokio::test]
    async fn authed_user_missing_is_not_found() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .with(eq(404))
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = AuthService::new(Arc::new(user_repo), Arc::new(MockRoleRepository::new()));
        let result = service.authed_user(404).await;
        assert!(matches!(result, Err(AuthServiceError::UserNotFound)));
    }
}
