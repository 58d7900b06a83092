//! Table query builder for the REST service.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::client::{BackendClient, check_response};
use crate::error::{AppError, Result};

/// Accept header asking for a single JSON object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Builder for a query against one table.
///
/// ```ignore
/// let history: Vec<AdminHistoryEntry> = client
///     .table("admin_history")
///     .auth(&session.access_token)
///     .select("*")
///     .eq("admin_uuid", uuid)
///     .order("registered_at", false)
///     .fetch()
///     .await?;
/// ```
pub struct QueryBuilder {
    client: BackendClient,
    table: String,
    access_token: Option<String>,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
    single: bool,
}

impl QueryBuilder {
    pub(crate) fn new(client: BackendClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            access_token: None,
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            single: false,
        }
    }

    /// Run the query as the signed-in operator.
    pub fn auth(mut self, access_token: &str) -> Self {
        self.access_token = Some(access_token.to_string());
        self
    }

    /// Columns to return, comma separated.
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.split(',').map(str::trim).collect::<Vec<_>>().join(",");
        self
    }

    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    /// Sort by `column`.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    /// Expect exactly one row.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filters.iter().cloned());
        if let Some((column, ascending)) = &self.order {
            let direction = if *ascending { "asc" } else { "desc" };
            pairs.push(("order".to_string(), format!("{column}.{direction}")));
        }
        pairs
    }

    pub(crate) fn build_select(&self) -> RequestBuilder {
        let mut request = self
            .client
            .request(
                Method::GET,
                &self.client.rest_url(&self.table),
                self.access_token.as_deref(),
            )
            .query(&self.query_pairs());

        if self.single {
            request = request.header(reqwest::header::ACCEPT, SINGLE_OBJECT);
        }
        request
    }

    pub(crate) fn build_insert<B: Serialize + ?Sized>(&self, body: &B) -> RequestBuilder {
        self.client
            .request(
                Method::POST,
                &self.client.rest_url(&self.table),
                self.access_token.as_deref(),
            )
            .query(&[("select", self.columns.as_str())])
            .header("Prefer", "return=representation")
            .json(body)
    }

    /// Fetch all matching rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        tracing::debug!(table = %self.table, "Select");
        let response = check_response(self.build_select().send().await?).await?;
        Ok(response.json().await?)
    }

    /// Fetch exactly one row. Zero rows maps to [`AppError::NotFound`].
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<T> {
        let query = self.single();
        tracing::debug!(table = %query.table, "Select single");
        let response = query.build_select().send().await?;

        // The REST service answers 406 when the row count is not exactly one.
        if response.status() == StatusCode::NOT_ACCEPTABLE {
            return Err(AppError::not_found(format!("no single row in '{}'", query.table)));
        }

        let response = check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Insert one row and return what the backend stored.
    pub async fn insert<B, T>(self, body: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(table = %self.table, "Insert");
        let response = check_response(self.build_insert(body).send().await?).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::client::tests::test_client;
    use std::collections::HashMap;

    fn pairs(request: &reqwest::Request) -> HashMap<String, String> {
        request.url().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_select_with_eq_and_single() {
        let request = test_client()
            .table("admin")
            .auth("jwt")
            .select("admin_uuid, first_name")
            .eq("email", "ana@library.ph")
            .single()
            .build_select()
            .build()
            .unwrap();

        assert_eq!(*request.method(), Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/admin");
        let query = pairs(&request);
        assert_eq!(query["select"], "admin_uuid,first_name");
        assert_eq!(query["email"], "eq.ana@library.ph");
        assert_eq!(request.headers()["accept"], SINGLE_OBJECT);
        assert_eq!(request.headers()["authorization"], "Bearer jwt");
    }

    #[test]
    fn test_order_descending() {
        let request = test_client()
            .table("admin_history")
            .eq("admin_uuid", "u-1")
            .order("registered_at", false)
            .build_select()
            .build()
            .unwrap();

        let query = pairs(&request);
        assert_eq!(query["select"], "*");
        assert_eq!(query["order"], "registered_at.desc");
        assert!(request.headers().get("accept").is_none());
    }

    #[test]
    fn test_insert_request() {
        let body = serde_json::json!({ "first_name": "Ana", "role": "Staff" });
        let request = test_client()
            .table("admin_history")
            .auth("jwt")
            .build_insert(&body)
            .build()
            .unwrap();

        assert_eq!(*request.method(), Method::POST);
        assert_eq!(request.url().path(), "/rest/v1/admin_history");
        assert_eq!(request.headers()["prefer"], "return=representation");
        assert_eq!(request.headers()["content-type"], "application/json");

        let sent: serde_json::Value =
            serde_json::from_slice(request.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(sent, body);
    }
}
