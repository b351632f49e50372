use crate::models::filters::UserFilters;
use crate::models::user::User;
use async_trait::async_trait;
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Record already exists")]
    AlreadyExists,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Columns a caller may sort the user listing by. Anything else falls back
/// to `created_at`, so raw request input never reaches the ORDER BY clause.
const SORTABLE_COLUMNS: &[&str] = &["name", "email", "created_at"];

pub(crate) fn sort_column<'a>(requested: &'a str, allowed: &[&'a str]) -> &'a str {
    if allowed.contains(&requested) {
        requested
    } else {
        "created_at"
    }
}

pub(crate) fn sort_direction(requested: &str) -> &'static str {
    if requested.eq_ignore_ascii_case("asc") {
        "ASC"
    } else {
        "DESC"
    }
}

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
    async fn update_password(&self, id: i64, password_hash: &str) -> RepositoryResult<()>;
    async fn delete_user(&self, id: i64) -> RepositoryResult<()>;
    async fn list_users(&self, filters: &UserFilters) -> RepositoryResult<Vec<User>>;
    async fn count_users(&self, search: &str) -> RepositoryResult<i64>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> RepositoryResult<User> {
        let result = sqlx::query("INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(res) => {
                let id = res.last_insert_rowid();
                self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
            }
            Err(e) => {
                if e.to_string().contains("UNIQUE") {
                    Err(RepositoryError::AlreadyExists)
                } else {
                    Err(RepositoryError::Database(e))
                }
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_user(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_users(&self, filters: &UserFilters) -> RepositoryResult<Vec<User>> {
        let column = sort_column(&filters.sort_by, SORTABLE_COLUMNS);
        let direction = sort_direction(&filters.sort_direction);
        let sql = format!(
            "SELECT id, name, email, password_hash, created_at FROM users \
             WHERE name LIKE ? OR email LIKE ? \
             ORDER BY {column} {direction} LIMIT ? OFFSET ?"
        );

        let pattern = format!("%{}%", filters.search);
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(filters.per_page.max(1))
            .bind(filters.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn count_users(&self, search: &str) -> RepositoryResult<i64> {
        let pattern = format!("%{search}%");
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE name LIKE ? OR email LIKE ?")
                .bind(&pattern)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
