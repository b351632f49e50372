use crate::models::client::{Client, ClientForm};
use sqlx::SqlitePool;

#[derive(Debug, thiserror::Error)]
pub enum ClientServiceError {
    #[error("Client not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct ClientService {
    pool: SqlitePool,
}

impl ClientService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>, ClientServiceError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, phone, created_at FROM clients ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn find_client(&self, id: i64) -> Result<Client, ClientServiceError> {
        sqlx::query_as::<_, Client>(
            "SELECT id, name, email, phone, created_at FROM clients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ClientServiceError::NotFound)
    }

    pub async fn create_client(&self, form: &ClientForm) -> Result<Client, ClientServiceError> {
        validate_name(&form.name)?;

        let result = sqlx::query("INSERT INTO clients (name, email, phone) VALUES (?, ?, ?)")
            .bind(form.name.trim())
            .bind(&form.email)
            .bind(&form.phone)
            .execute(&self.pool)
            .await?;

        self.find_client(result.last_insert_rowid()).await
    }

    pub async fn update_client(&self, id: i64, form: &ClientForm) -> Result<(), ClientServiceError> {
        validate_name(&form.name)?;

        let result = sqlx::query("UPDATE clients SET name = ?, email = ?, phone = ? WHERE id = ?")
            .bind(form.name.trim())
            .bind(&form.email)
            .bind(&form.phone)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ClientServiceError::NotFound);
        }

        Ok(())
    }

    /// Deleting a client leaves its employments in place with a null
    /// client reference (ON DELETE SET NULL).
    pub async fn delete_client(&self, id: i64) -> Result<(), ClientServiceError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ClientServiceError::NotFound);
        }

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), ClientServiceError> {
    if name.trim().is_empty() {
        return Err(ClientServiceError::Validation(
            "Client name is required".to_string(),
        ));
    }
    Ok(())
}
