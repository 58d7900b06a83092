//! Staff rows and staff ID generation.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::Deserialize;

/// Row of the `staff` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Staff {
    pub staff_id: i64,
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

/// Build a staff ID: the year followed by a random six-digit suffix.
pub fn generate_staff_id<R: Rng + ?Sized>(year: i32, rng: &mut R) -> i64 {
    let suffix: i64 = rng.gen_range(100_000..=999_999);
    i64::from(year) * 1_000_000 + suffix
}
