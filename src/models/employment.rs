use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Allowed values for `employments.status`. The domain is closed but the
/// transitions are free-form: any value may be set at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmploymentStatus {
    Active,
    Inactive,
    Terminated,
}

impl EmploymentStatus {
    pub const ALL: [EmploymentStatus; 3] = [
        EmploymentStatus::Active,
        EmploymentStatus::Inactive,
        EmploymentStatus::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Active => "active",
            EmploymentStatus::Inactive => "inactive",
            EmploymentStatus::Terminated => "terminated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(EmploymentStatus::Active),
            "inactive" => Some(EmploymentStatus::Inactive),
            "terminated" => Some(EmploymentStatus::Terminated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Employment {
    pub id: i64,
    pub user_id: i64,
    pub client_id: Option<i64>,
    pub position: String,
    pub hire_date: String,
    pub status: String,
    pub salary: f64,
    pub work_location: String,
    pub effective_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: String,
}

/// Listing row joined with the owning user and (optional) client names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EmploymentDetail {
    pub id: i64,
    pub user_id: i64,
    pub client_id: Option<i64>,
    pub position: String,
    pub hire_date: String,
    pub status: String,
    pub salary: f64,
    pub work_location: String,
    pub effective_date: Option<String>,
    pub end_date: Option<String>,
    pub user_name: String,
    pub client_name: Option<String>,
}

/// Explicit allow-list of writable employment fields; shared by the create
/// and update paths.
#[derive(Debug, Clone, Deserialize)]
pub struct EmploymentForm {
    pub user_id: i64,
    #[serde(default, deserialize_with = "empty_as_none_id")]
    pub client_id: Option<i64>,
    pub position: String,
    pub hire_date: String,
    pub status: String,
    pub salary: f64,
    #[serde(default)]
    pub work_location: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub effective_date: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

/// HTML forms submit empty strings for blank optional fields.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

pub(crate) fn empty_as_none_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_known_values() {
        for status in EmploymentStatus::ALL {
            assert_eq!(EmploymentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EmploymentStatus::parse("on_leave"), None);
        assert_eq!(EmploymentStatus::parse("ACTIVE"), None);
    }

    #[test]
    fn form_blank_optionals_become_none() {
        let form: EmploymentForm = serde_json::from_value(serde_json::json!({
            "user_id": 3,
            "client_id": "",
            "position": "Engineer",
            "hire_date": "2025-04-01",
            "status": "active",
            "salary": 72000.0,
            "end_date": ""
        }))
        .unwrap();

        assert_eq!(form.client_id, None);
        assert_eq!(form.end_date, None);
        assert_eq!(form.effective_date, None);
        assert_eq!(form.work_location, "");
    }

    #[test]
    fn form_parses_client_id_when_present() {
        let form: EmploymentForm = serde_json::from_value(serde_json::json!({
            "user_id": 3,
            "client_id": "12",
            "position": "Engineer",
            "hire_date": "2025-04-01",
            "status": "inactive",
            "salary": 60000.0
        }))
        .unwrap();

        assert_eq!(form.client_id, Some(12));
    }
}
