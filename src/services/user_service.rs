use crate::models::filters::UserFilters;
use crate::models::user::User;
use crate::repositories::role_repository::RoleRepository;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password too weak (minimum 8 characters)")]
    WeakPassword,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("User not found")]
    UserNotFound,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: Option<String>,
    /// Role names attached after creation, e.g. `["employee"]`.
    pub roles: Vec<String>,
}

pub struct UpdatePasswordRequest {
    pub user_id: i64,
    pub new_password: String,
    pub new_password_confirm: Option<String>,
}

pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    role_repository: Arc<dyn RoleRepository>,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        role_repository: Arc<dyn RoleRepository>,
    ) -> Self {
        Self {
            user_repository,
            role_repository,
        }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<User, UserServiceError> {
        self.validate_email(&request.email)?;

        if let Some(ref confirm) = request.password_confirm {
            if request.password != *confirm {
                return Err(UserServiceError::PasswordMismatch);
            }
        }

        self.validate_password(&request.password)?;

        let password_hash = self.hash_password(&request.password)?;

        let user = match self
            .user_repository
            .create_user(&request.name, &request.email, &password_hash)
            .await
        {
            Ok(user) => user,
            Err(RepositoryError::AlreadyExists) => return Err(UserServiceError::EmailTaken),
            Err(e) => return Err(UserServiceError::RepositoryError(e)),
        };

        for role_name in &request.roles {
            self.attach_role(user.id, role_name).await?;
        }

        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.user_repository.find_by_email(email).await?)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.user_repository.find_by_id(id).await?)
    }

    pub async fn list_users(&self, filters: &UserFilters) -> Result<Vec<User>, UserServiceError> {
        Ok(self.user_repository.list_users(filters).await?)
    }

    pub async fn count_users(&self, search: &str) -> Result<i64, UserServiceError> {
        Ok(self.user_repository.count_users(search).await?)
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        match self.user_repository.delete_user(id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn update_password(
        &self,
        request: UpdatePasswordRequest,
    ) -> Result<(), UserServiceError> {
        if let Some(ref confirm) = request.new_password_confirm {
            if request.new_password != *confirm {
                return Err(UserServiceError::PasswordMismatch);
            }
        }

        self.validate_password(&request.new_password)?;

        let password_hash = self.hash_password(&request.new_password)?;

        match self
            .user_repository
            .update_password(request.user_id, &password_hash)
            .await
        {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn attach_role(&self, user_id: i64, role_name: &str) -> Result<(), UserServiceError> {
        let role = self
            .role_repository
            .find_by_name(role_name)
            .await?
            .ok_or_else(|| UserServiceError::UnknownRole(role_name.to_string()))?;

        self.role_repository.attach_role(user_id, role.id).await?;
        Ok(())
    }

    pub async fn detach_role(&self, user_id: i64, role_name: &str) -> Result<(), UserServiceError> {
        let role = self
            .role_repository
            .find_by_name(role_name)
            .await?
            .ok_or_else(|| UserServiceError::UnknownRole(role_name.to_string()))?;

        match self.role_repository.detach_role(user_id, role.id).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(UserServiceError::UserNotFound),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    fn validate_email(&self, email: &str) -> Result<(), UserServiceError> {
        if !email.contains('@') || email.len() > 255 || email.is_empty() {
            return Err(UserServiceError::InvalidEmail);
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), UserServiceError> {
        if password.len() < 8 {
            return Err(UserServiceError::WeakPassword);
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::role::Role;
    use crate::repositories::role_repository::MockRoleRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use mockall::predicate::*;

    fn sample_user(id: i64) -> User {
        User {
            id,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            created_at: "2026-01-01 00:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn create_user_attaches_requested_roles() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_create_user()
            .with(eq("Test"), eq("test@example.com"), always())
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Ok(sample_user(1)) }));

        let mut role_repo = MockRoleRepository::new();
        role_repo
            .expect_find_by_name()
            .with(eq("employee"))
            .times(1)
            .returning(|_| {
                Box::pin(async move {
                    Ok(Some(Role {
                        id: 2,
                        name: "employee".to_string(),
                        description: String::new(),
                    }))
                })
            });
        role_repo
            .expect_attach_role()
            .with(eq(1), eq(2))
            .times(1)
            .returning(|_, _| Box::pin(async move { Ok(()) }));

        let service = UserService::new(Arc::new(user_repo), Arc::new(role_repo));

        let user = service
            .create_user(CreateUserRequest {
                name: "Test".to_string(),
                email: "test@example.com".to_string(),
                password: "password123".to_string(),
                password_confirm: None,
                roles: vec!["employee".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(user.id, 1);
    }

    #[tokio::test]
    async fn create_user_rejects_weak_password() {
        let service = UserService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockRoleRepository::new()),
        );

        let result = service
            .create_user(CreateUserRequest {
                name: "Test".to_string(),
                email: "test@example.com".to_string(),
                password: "short".to_string(),
                password_confirm: None,
                roles: vec![],
            })
            .await;

        assert!(matches!(result, Err(UserServiceError::WeakPassword)));
    }

    #[tokio::test]
    async fn create_user_rejects_invalid_email() {
        let service = UserService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockRoleRepository::new()),
        );

        let result = service
            .create_user(CreateUserRequest {
                name: "Test".to_string(),
                email: "not-an-email".to_string(),
                password: "password123".to_string(),
                password_confirm: None,
                roles: vec![],
            })
            .await;

        assert!(matches!(result, Err(UserServiceError::InvalidEmail)));
    }

    #[tokio::test]
    async fn create_user_rejects_mismatched_confirmation() {
        let service = UserService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockRoleRepository::new()),
        );

        let result = service
            .create_user(CreateUserRequest {
                name: "Test".to_string(),
                email: "test@example.com".to_string(),
                password: "password123".to_string(),
                password_confirm: Some("password124".to_string()),
                roles: vec![],
            })
            .await;

        assert!(matches!(result, Err(UserServiceError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn attach_role_rejects_unknown_role() {
        let mut role_repo = MockRoleRepository::new();
        role_repo
            .expect_find_by_name()
            .with(eq("manager"))
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = UserService::new(Arc::new(MockUserRepository::new()), Arc::new(role_repo));

        let result = service.attach_role(1, "manager").await;
        assert!(matches!(result, Err(UserServiceError::UnknownRole(name)) if name == "manager"));
    }
}
