use crate::models::role::Role;
use crate::repositories::user_repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait RoleRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Role>>;
    async fn roles_for_user(&self, user_id: i64) -> RepositoryResult<Vec<Role>>;
    async fn attach_role(&self, user_id: i64, role_id: i64) -> RepositoryResult<()>;
    async fn detach_role(&self, user_id: i64, role_id: i64) -> RepositoryResult<()>;
}

pub struct SqliteRoleRepository {
    pool: SqlitePool,
}

impl SqliteRoleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for SqliteRoleRepository {
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Role>> {
        let role =
            sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(role)
    }

    async fn roles_for_user(&self, user_id: i64) -> RepositoryResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT r.id, r.name, r.description FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = ? ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    async fn attach_role(&self, user_id: i64, role_id: i64) -> RepositoryResult<()> {
        // Re-attaching an already-held role is a no-op, not an error.
        sqlx::query("INSERT OR IGNORE INTO user_roles (user_id, role_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn detach_role(&self, user_id: i64, role_id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = ? AND role_id = ?")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
