//! Configuration for the backend connection and the client components

use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

/// Name of the collection holding provider registrations
pub const DEFAULT_TABLE: &str = "laundryShops";

/// Password accepted by the admin gate when none is configured.
///
/// This is a placeholder: it ships inside the client and anyone can read it.
/// Real deployments need credentials verified by the server.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Connection settings for the hosted backend project
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project base URL
    pub url: Url,
    /// Anonymous (public) API key
    pub anon_key: String,
}

impl StoreConfig {
    /// Creates a new configuration, validating the URL and key.
    pub fn new(url_str: &str, anon_key: impl Into<String>) -> Result<Self> {
        let url = Url::parse(url_str)?;
        let anon_key = anon_key.into();
        if anon_key.is_empty() {
            return Err(Error::config("anon_key cannot be empty"));
        }
        if reqwest::header::HeaderValue::from_str(&anon_key).is_err() {
            return Err(Error::config("anon_key is not valid header text"));
        }
        Ok(Self { url, anon_key })
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY` from the environment.
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var("SUPABASE_URL")
            .map_err(|_| Error::config("SUPABASE_URL environment variable not found"))?;
        let anon_key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| Error::config("SUPABASE_ANON_KEY environment variable not found"))?;
        Self::new(&url_str, anon_key)
    }

    /// Base URL without a trailing slash, ready for path concatenation
    pub fn base_url(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }
}

/// Tunables shared by the client and the form/admin components
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// The database schema
    pub db_schema: String,

    /// Collection that registrations are written to
    pub table: String,

    /// How long the registration success notice stays visible
    pub notice_duration: Duration,

    /// Password the admin gate compares against
    pub admin_password: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            db_schema: "public".to_string(),
            table: DEFAULT_TABLE.to_string(),
            notice_duration: Duration::from_secs(3),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl ClientOptions {
    /// Defaults overlaid with `ADMIN_PASSWORD` when it is set
    pub fn from_env() -> Self {
        let options = Self::default();
        match std::env::var("ADMIN_PASSWORD") {
            Ok(password) if !password.is_empty() => options.with_admin_password(&password),
            _ => options,
        }
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the database schema
    pub fn with_db_schema(mut self, value: &str) -> Self {
        self.db_schema = value.to_string();
        self
    }

    /// Set the collection name
    pub fn with_table(mut self, value: &str) -> Self {
        self.table = value.to_string();
        self
    }

    /// Set how long the success notice is shown
    pub fn with_notice_duration(mut self, value: Duration) -> Self {
        self.notice_duration = value;
        self
    }

    /// Set the admin gate password
    pub fn with_admin_password(mut self, value: &str) -> Self {
        self.admin_password = value.to_string();
        self
    }
}
