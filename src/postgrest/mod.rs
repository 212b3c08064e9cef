//! Table operations through the PostgREST API

mod query;
mod types;

use reqwest::Client;
use serde::Serialize;

pub use query::*;
use query::TableRequest;
pub use types::*;

/// Client for operations on one table
pub struct PostgrestClient {
    request: TableRequest,
}

impl PostgrestClient {
    /// Create a new PostgrestClient
    pub fn new(url: &str, key: &str, schema: &str, table: &str, client: Client) -> Self {
        Self {
            request: TableRequest {
                url: format!("{}/rest/v1/{}", url.trim_end_matches('/'), table),
                key: key.to_string(),
                schema: schema.to_string(),
                client,
            },
        }
    }

    /// Endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.request.url
    }

    /// Select specific columns from the table
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(self.request.clone(), columns)
    }

    /// Insert data into the table
    pub fn insert<T: Serialize>(&self, values: T) -> InsertBuilder<T> {
        InsertBuilder::new(self.request.clone(), values)
    }

    /// Delete data from the table
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.request.clone())
    }
}
