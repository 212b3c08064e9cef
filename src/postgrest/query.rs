//! Query builders for the PostgREST table client

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder, CLIENT_INFO};
use crate::postgrest::types::ReturnOption;

/// Accumulated query string parameters
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: HashMap<String, String>,
}

impl QueryBuilder {
    /// Create a new QueryBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter to the query
    pub fn add_param(&mut self, key: &str, value: &str) {
        self.params.insert(key.to_string(), value.to_string());
    }

    /// Add an `eq` filter on a column
    pub fn add_eq<T: ToString>(&mut self, column: &str, value: T) {
        self.add_param(column, &format!("eq.{}", value.to_string()));
    }

    /// Get the query parameters
    pub fn get_params(&self) -> &HashMap<String, String> {
        &self.params
    }
}

/// Connection details every builder needs
#[derive(Debug, Clone)]
pub(crate) struct TableRequest {
    pub(crate) url: String,
    pub(crate) key: String,
    pub(crate) schema: String,
    pub(crate) client: Client,
}

impl TableRequest {
    fn authorize<'a>(&self, fetch: FetchBuilder<'a>, profile_header: &'static str) -> FetchBuilder<'a> {
        fetch
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .header(profile_header, &self.schema)
    }
}

/// Builder for SELECT queries
pub struct SelectBuilder {
    request: TableRequest,
    query: QueryBuilder,
}

impl SelectBuilder {
    pub(crate) fn new(request: TableRequest, columns: &str) -> Self {
        let mut query = QueryBuilder::new();
        query.add_param("select", columns);
        Self { request, query }
    }

    /// Execute the query and return the results
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        let fetch = self
            .request
            .authorize(Fetch::get(&self.request.client, &self.request.url), "Accept-Profile")
            .query(self.query.get_params());

        fetch.execute::<Vec<T>>().await
    }
}

/// Builder for INSERT queries
pub struct InsertBuilder<T: Serialize> {
    request: TableRequest,
    values: T,
}

impl<T: Serialize> InsertBuilder<T> {
    pub(crate) fn new(request: TableRequest, values: T) -> Self {
        Self { request, values }
    }

    /// Execute the insert and return the written rows
    pub async fn execute<R: DeserializeOwned>(&self) -> Result<Vec<R>, Error> {
        let fetch = self
            .request
            .authorize(Fetch::post(&self.request.client, &self.request.url), "Content-Profile")
            .header("Prefer", ReturnOption::Representation.as_prefer())
            .json(&self.values)?;

        fetch.execute::<Vec<R>>().await
    }
}

/// Builder for DELETE queries
pub struct DeleteBuilder {
    request: TableRequest,
    query: QueryBuilder,
}

impl DeleteBuilder {
    pub(crate) fn new(request: TableRequest) -> Self {
        Self {
            request,
            query: QueryBuilder::new(),
        }
    }

    /// Filter rows where column equals a value
    pub fn eq<V: ToString>(mut self, column: &str, value: V) -> Self {
        self.query.add_eq(column, value);
        self
    }

    /// Execute the delete without returning the deleted rows.
    ///
    /// Refuses to run without a filter, since PostgREST would otherwise
    /// remove every row in the table.
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        if self.query.get_params().is_empty() {
            return Err(Error::database("refusing to delete without a filter"));
        }

        let fetch = self
            .request
            .authorize(Fetch::delete(&self.request.client, &self.request.url), "Content-Profile")
            .header("Prefer", ReturnOption::Minimal.as_prefer())
            .query(self.query.get_params());

        fetch.execute_empty().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_filter_is_encoded_with_operator_prefix() {
        let mut query = QueryBuilder::new();
        query.add_eq("id", 42);
        assert_eq!(query.get_params().get("id").map(String::as_str), Some("eq.42"));
    }

    #[test]
    fn later_params_replace_earlier_ones() {
        let mut query = QueryBuilder::new();
        query.add_param("select", "id");
        query.add_param("select", "*");
        assert_eq!(query.get_params().len(), 1);
        assert_eq!(query.get_params()["select"], "*");
    }
}
