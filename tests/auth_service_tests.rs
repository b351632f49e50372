use staffdesk::{
    repositories::{SqliteRoleRepository, SqliteUserRepository},
    services::{
        auth_service::{AuthService, AuthServiceError, LoginRequest},
        user_service::{CreateUserRequest, UserService},
    },
    test_utils::test_helpers,
};
use std::sync::Arc;

fn services(pool: sqlx::SqlitePool) -> (UserService, AuthService) {
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let role_repository = Arc::new(SqliteRoleRepository::new(pool));
    (
        UserService::new(user_repository.clone(), role_repository.clone()),
        AuthService::new(user_repository, role_repository),
    )
}

#[tokio::test]
async fn authenticate_success() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let (user_service, auth_service) = services(pool);

    let created = user_service
        .create_user(CreateUserRequest {
            name: "Avery".to_string(),
            email: "avery@example.com".to_string(),
            password: "correctpassword".to_string(),
            password_confirm: None,
            roles: vec![],
        })
        .await
        .unwrap();

    let result = auth_service
        .authenticate(LoginRequest {
            email: "avery@example.com".to_string(),
            password: "correctpassword".to_string(),
        })
        .await;

    let user = result.unwrap();
    assert_eq!(user.id, created.id);
    assert_eq!(user.email, "avery@example.com");
}

#[tokio::test]
async fn authenticate_wrong_password_and_unknown_email_look_identical() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let (user_service, auth_service) = services(pool);

    user_service
        .create_user(CreateUserRequest {
            name: "Avery".to_string(),
            email: "known@example.com".to_string(),
            password: "correctpassword".to_string(),
            password_confirm: None,
            roles: vec![],
        })
        .await
        .unwrap();

    let wrong_password = auth_service
        .authenticate(LoginRequest {
            email: "known@example.com".to_string(),
            password: "wrongpassword".to_string(),
        })
        .await
        .unwrap_err();

    let unknown_email = auth_service
        .authenticate(LoginRequest {
            email: "nonexistent@example.com".to_string(),
            password: "wrongpassword".to_string(),
        })
        .await
        .unwrap_err();

    // Neither path may reveal whether the account exists.
    assert!(matches!(wrong_password, AuthServiceError::InvalidCredentials));
    assert!(matches!(unknown_email, AuthServiceError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn authed_user_loads_attached_roles() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let user_id = test_helpers::insert_test_user(&pool, "Robin", "robin@example.com", "password123")
        .await
        .unwrap();
    test_helpers::attach_role(&pool, user_id, "employee")
        .await
        .unwrap();

    let (_, auth_service) = services(pool);

    let authed = auth_service.authed_user(user_id).await.unwrap();
    assert!(authed.is_employee());
    assert!(!authed.is_admin());

    let result = auth_service.authed_user(9999).await;
    assert!(matches!(result, Err(AuthServiceError::UserNotFound)));
}

#[tokio::test]
async fn authed_user_can_hold_both_roles() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let user_id = test_helpers::insert_test_user(&pool, "Kim", "kim@example.com", "password123")
        .await
        .unwrap();
    test_helpers::attach_role(&pool, user_id, "admin").await.unwrap();
    test_helpers::attach_role(&pool, user_id, "employee")
        .await
        .unwrap();

    let (_, auth_service) = services(pool);

    let authed = auth_service.authed_user(user_id).await.unwrap();
    assert!(authed.is_admin());
    assert!(authed.is_employee());
}
