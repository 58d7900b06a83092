//! Staff repository.

use crate::backend::BackendClient;
use crate::error::Result;
use crate::models::{NewProfile, Role, Staff};

const TABLE: &str = Role::Staff.table();

/// List every staff row.
pub async fn list_all(client: &BackendClient, access_token: &str) -> Result<Vec<Staff>> {
    client.table(TABLE).auth(access_token).select("*").fetch().await
}

/// Insert a new staff profile. `profile.staff_id` must be set.
pub async fn insert(client: &BackendClient, access_token: &str, profile: &NewProfile) -> Result<()> {
    let _: Vec<serde_json::Value> = client
        .table(TABLE)
        .auth(access_token)
        .select("staff_id")
        .insert(profile)
        .await?;
    Ok(())
}
