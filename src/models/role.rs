use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Role names are reference data seeded by migration; access checks compare
/// against these constants rather than subclassing by role.
pub const ADMIN: &str = "admin";
pub const EMPLOYEE: &str = "employee";

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: String,
}
