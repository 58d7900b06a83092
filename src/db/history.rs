//! Admin registration history repository.

use crate::backend::BackendClient;
use crate::error::Result;
use crate::models::{AdminHistoryEntry, NewHistoryEntry};

const TABLE: &str = "admin_history";

/// History of one admin, newest first.
pub async fn list_for_admin(
    client: &BackendClient,
    access_token: &str,
    admin_uuid: &str,
) -> Result<Vec<AdminHistoryEntry>> {
    client
        .table(TABLE)
        .auth(access_token)
        .select("*")
        .eq("admin_uuid", admin_uuid)
        .order("registered_at", false)
        .fetch()
        .await
}

/// Record a registration.
pub async fn insert(client: &BackendClient, access_token: &str, entry: &NewHistoryEntry) -> Result<()> {
    let _: Vec<serde_json::Value> = client.table(TABLE).auth(access_token).insert(entry).await?;
    Ok(())
}
