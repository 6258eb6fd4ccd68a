use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Engineering department. `dept_code` is exactly 3 characters and
/// `dept_name` ends with "engineering"; both rules are enforced by the
/// client-side schema before any request is made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: Uuid,
    pub dept_name: String,
    pub dept_code: String,
    #[serde(default)]
    pub course_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
