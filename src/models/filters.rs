use serde::Deserialize;

fn default_sort_by() -> String {
    "created_at".to_string()
}

fn default_sort_direction() -> String {
    "desc".to_string()
}

fn default_per_page() -> i64 {
    15
}

fn default_page() -> i64 {
    1
}

/// Listing parameters for `GET /admin/users`, taken straight from the query
/// string. No validation happens here beyond type coercion; the repository
/// maps `sort_by` through its column allow-list.
#[derive(Debug, Clone, Deserialize)]
pub struct UserFilters {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    #[serde(default = "default_page")]
    pub page: i64,
}

impl Default for UserFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_by: default_sort_by(),
            sort_direction: default_sort_direction(),
            per_page: default_per_page(),
            page: default_page(),
        }
    }
}

impl UserFilters {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.per_page.max(1)
    }
}

/// Listing parameters for `GET /admin/employments`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmploymentFilters {
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_direction")]
    pub sort_direction: String,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    #[serde(default = "default_page")]
    pub page: i64,
}

impl Default for EmploymentFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_by: default_sort_by(),
            sort_direction: default_sort_direction(),
            per_page: default_per_page(),
            page: default_page(),
        }
    }
}

impl EmploymentFilters {
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.per_page.max(1)
    }
}
