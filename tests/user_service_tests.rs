use staffdesk::{
    models::filters::UserFilters,
    repositories::{SqliteRoleRepository, SqliteUserRepository},
    services::user_service::{CreateUserRequest, UserService, UserServiceError},
    test_utils::test_helpers,
};
use std::sync::Arc;

fn service(pool: sqlx::SqlitePool) -> UserService {
    UserService::new(
        Arc::new(SqliteUserRepository::new(pool.clone())),
        Arc::new(SqliteRoleRepository::new(pool)),
    )
}

fn request(name: &str, email: &str, roles: &[&str]) -> CreateUserRequest {
    CreateUserRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        password_confirm: None,
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

#[tokio::test]
async fn create_user_with_seeded_role() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = service(pool.clone());

    let user = service
        .create_user(request("Priya", "priya@example.com", &["employee"]))
        .await
        .unwrap();

    let roles: Vec<(String,)> = sqlx::query_as(
        "SELECT r.name FROM roles r JOIN user_roles ur ON ur.role_id = r.id WHERE ur.user_id = ?",
    )
    .bind(user.id)
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(roles, vec![("employee".to_string(),)]);
}

#[tokio::test]
async fn create_user_with_unknown_role_fails() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = service(pool);

    let result = service
        .create_user(request("Priya", "priya@example.com", &["superuser"]))
        .await;

    assert!(matches!(result, Err(UserServiceError::UnknownRole(name)) if name == "superuser"));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = service(pool);

    service
        .create_user(request("First", "dup@example.com", &[]))
        .await
        .unwrap();

    let result = service
        .create_user(request("Second", "dup@example.com", &[]))
        .await;

    assert!(matches!(result, Err(UserServiceError::EmailTaken)));
}

#[tokio::test]
async fn listing_defaults_to_newest_first() {
    let pool = test_helpers::create_test_db().await.unwrap();

    // created_at has second granularity, so pin distinct timestamps.
    for (i, name) in ["Alpha", "Beta", "Gamma"].iter().enumerate() {
        sqlx::query(
            "INSERT INTO users (name, email, password_hash, created_at) VALUES (?, ?, 'x', ?)",
        )
        .bind(name)
        .bind(format!("{}@example.com", name.to_lowercase()))
        .bind(format!("2026-01-0{} 12:00:00", i + 1))
        .execute(&pool)
        .await
        .unwrap();
    }

    let service = service(pool);

    let users = service.list_users(&UserFilters::default()).await.unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Gamma", "Beta", "Alpha"]);
}

#[tokio::test]
async fn listing_applies_search_and_sort() {
    let pool = test_helpers::create_test_db().await.unwrap();
    test_helpers::insert_test_user(&pool, "Ada Lovelace", "ada@example.com", "password123")
        .await
        .unwrap();
    test_helpers::insert_test_user(&pool, "Grace Hopper", "grace@example.com", "password123")
        .await
        .unwrap();
    test_helpers::insert_test_user(&pool, "Adam Smith", "adam@corp.example", "password123")
        .await
        .unwrap();

    let service = service(pool);

    let filters = UserFilters {
        search: "Ada".to_string(),
        sort_by: "name".to_string(),
        sort_direction: "asc".to_string(),
        ..UserFilters::default()
    };

    let users = service.list_users(&filters).await.unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Ada Lovelace", "Adam Smith"]);

    assert_eq!(service.count_users("Ada").await.unwrap(), 2);
    assert_eq!(service.count_users("").await.unwrap(), 3);
}

#[tokio::test]
async fn hostile_sort_column_still_lists() {
    let pool = test_helpers::create_test_db().await.unwrap();
    test_helpers::insert_test_user(&pool, "Solo", "solo@example.com", "password123")
        .await
        .unwrap();

    let service = service(pool);

    let filters = UserFilters {
        sort_by: "password_hash; DROP TABLE users".to_string(),
        ..UserFilters::default()
    };

    // Falls back to created_at rather than interpolating the input.
    let users = service.list_users(&filters).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn pagination_slices_by_page() {
    let pool = test_helpers::create_test_db().await.unwrap();
    for i in 0..20 {
        sqlx::query(
            "INSERT INTO users (name, email, password_hash, created_at) VALUES (?, ?, 'x', ?)",
        )
        .bind(format!("User {i:02}"))
        .bind(format!("user{i:02}@example.com"))
        .bind(format!("2026-01-01 12:00:{i:02}"))
        .execute(&pool)
        .await
        .unwrap();
    }

    let service = service(pool);

    let first = service.list_users(&UserFilters::default()).await.unwrap();
    assert_eq!(first.len(), 15);

    let second = service
        .list_users(&UserFilters {
            page: 2,
            ..UserFilters::default()
        })
        .await
        .unwrap();
    assert_eq!(second.len(), 5);
}
