use crate::models::employment::{Employment, EmploymentDetail, EmploymentForm, EmploymentStatus};
use crate::models::filters::EmploymentFilters;
use crate::repositories::user_repository::{sort_column, sort_direction};
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum EmploymentServiceError {
    #[error("Employment not found")]
    NotFound,
    #[error("Unknown user or client reference")]
    UnknownReference,
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Columns the admin listing may sort by; everything else falls back to
/// `created_at`. All live on the employments table, so the ORDER BY is
/// qualified with its alias.
const SORTABLE_COLUMNS: &[&str] = &["position", "hire_date", "status", "salary", "created_at"];

const DETAIL_SELECT: &str = "SELECT e.id, e.user_id, e.client_id, e.position, e.hire_date, \
     e.status, e.salary, e.work_location, e.effective_date, e.end_date, \
     u.name AS user_name, c.name AS client_name \
     FROM employments e \
     JOIN users u ON u.id = e.user_id \
     LEFT JOIN clients c ON c.id = e.client_id";

pub struct EmploymentService {
    pool: SqlitePool,
}

impl EmploymentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Admin listing over every employment row, filtered and sorted per the
    /// request DTO.
    pub async fn list(
        &self,
        filters: &EmploymentFilters,
    ) -> Result<Vec<EmploymentDetail>, EmploymentServiceError> {
        let column = sort_column(&filters.sort_by, SORTABLE_COLUMNS);
        let direction = sort_direction(&filters.sort_direction);
        let sql = format!(
            "{DETAIL_SELECT} WHERE u.name LIKE ? OR e.position LIKE ? \
             ORDER BY e.{column} {direction} LIMIT ? OFFSET ?"
        );

        let pattern = format!("%{}%", filters.search);
        let rows = sqlx::query_as::<_, EmploymentDetail>(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(filters.per_page.max(1))
            .bind(filters.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn count(&self, search: &str) -> Result<i64, EmploymentServiceError> {
        let pattern = format!("%{search}%");
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM employments e JOIN users u ON u.id = e.user_id \
             WHERE u.name LIKE ? OR e.position LIKE ?",
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Self-scoped listing: only rows owned by `user_id`.
    pub async fn list_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<EmploymentDetail>, EmploymentServiceError> {
        let sql = format!("{DETAIL_SELECT} WHERE e.user_id = ? ORDER BY e.created_at DESC");
        let rows = sqlx::query_as::<_, EmploymentDetail>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: i64) -> Result<Employment, EmploymentServiceError> {
        sqlx::query_as::<_, Employment>(
            "SELECT id, user_id, client_id, position, hire_date, status, salary, \
             work_location, effective_date, end_date, created_at \
             FROM employments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(EmploymentServiceError::NotFound)
    }

    pub async fn find_detail(&self, id: i64) -> Result<EmploymentDetail, EmploymentServiceError> {
        let sql = format!("{DETAIL_SELECT} WHERE e.id = ?");
        sqlx::query_as::<_, EmploymentDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(EmploymentServiceError::NotFound)
    }

    pub async fn create(&self, form: &EmploymentForm) -> Result<Employment, EmploymentServiceError> {
        validate_status(&form.status)?;

        let result = sqlx::query(
            "INSERT INTO employments \
             (user_id, client_id, position, hire_date, status, salary, work_location, \
              effective_date, end_date) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(form.user_id)
        .bind(form.client_id)
        .bind(&form.position)
        .bind(&form.hire_date)
        .bind(&form.status)
        .bind(form.salary)
        .bind(&form.work_location)
        .bind(&form.effective_date)
        .bind(&form.end_date)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        self.find(result.last_insert_rowid()).await
    }

    /// Status transitions are free-form; the only constraint is the value
    /// domain itself.
    pub async fn update(
        &self,
        id: i64,
        form: &EmploymentForm,
    ) -> Result<(), EmploymentServiceError> {
        validate_status(&form.status)?;

        let result = sqlx::query(
            "UPDATE employments SET user_id = ?, client_id = ?, position = ?, hire_date = ?, \
             status = ?, salary = ?, work_location = ?, effective_date = ?, end_date = ? \
             WHERE id = ?",
        )
        .bind(form.user_id)
        .bind(form.client_id)
        .bind(&form.position)
        .bind(&form.hire_date)
        .bind(&form.status)
        .bind(form.salary)
        .bind(&form.work_location)
        .bind(&form.effective_date)
        .bind(&form.end_date)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_reference_error)?;

        if result.rows_affected() == 0 {
            return Err(EmploymentServiceError::NotFound);
        }

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), EmploymentServiceError> {
        let result = sqlx::query("DELETE FROM employments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EmploymentServiceError::NotFound);
        }

        Ok(())
    }
}

fn validate_status(status: &str) -> Result<(), EmploymentServiceError> {
    if EmploymentStatus::parse(status).is_none() {
        return Err(EmploymentServiceError::InvalidStatus(status.to_string()));
    }
    Ok(())
}

fn map_reference_error(e: sqlx::Error) -> EmploymentServiceError {
    if e.to_string().contains("FOREIGN KEY") {
        EmploymentServiceError::UnknownReference
    } else {
        EmploymentServiceError::Database(e)
    }
}
