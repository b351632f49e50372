use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}

/// Explicit allow-list of writable client fields. Every write path goes
/// through this struct; nothing else reaches the table.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientForm {
    pub name: String,
    #[serde(default, deserialize_with = "super::employment::empty_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "super::employment::empty_as_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}
