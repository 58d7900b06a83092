//! Admin repository.

use crate::backend::BackendClient;
use crate::error::Result;
use crate::models::{Admin, AdminProfile, NewProfile, Role};

const TABLE: &str = Role::Admin.table();

/// List every admin row.
pub async fn list_all(client: &BackendClient, access_token: &str) -> Result<Vec<Admin>> {
    client.table(TABLE).auth(access_token).select("*").fetch().await
}

/// Find the admin identity belonging to an email.
pub async fn find_by_email(client: &BackendClient, access_token: &str, email: &str) -> Result<AdminProfile> {
    client
        .table(TABLE)
        .auth(access_token)
        .select(AdminProfile::COLUMNS)
        .eq("email", email)
        .fetch_one()
        .await
}

/// Insert a new admin profile.
pub async fn insert(client: &BackendClient, access_token: &str, profile: &NewProfile) -> Result<()> {
    let _: Vec<serde_json::Value> = client
        .table(TABLE)
        .auth(access_token)
        .select("email")
        .insert(profile)
        .await?;
    Ok(())
}
