//! Admin rows and the shared profile DTO.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Row of the `admin` table as listed in user management.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Admin {
    #[serde(default)]
    pub admin_uuid: Option<String>,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// The signed-in operator's admin identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminProfile {
    pub admin_uuid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl AdminProfile {
    /// Columns selected for the operator lookup.
    pub const COLUMNS: &'static str = "admin_uuid, email, first_name, middle_name, last_name";

    /// Name shown in the top bar.
    pub fn display_first_name(&self) -> &str {
        self.first_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Default Admin User")
    }

    /// First, middle and last name joined, skipping blanks.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// DTO for inserting an admin or staff profile row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProfile {
    pub email: String,
    /// Password hash, never the plain text.
    pub password: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub birthday: Option<NaiveDate>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<i64>,
}
