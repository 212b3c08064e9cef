//! Laundry Studio
//!
//! Registration of laundry service providers and a small admin listing,
//! backed by a table on a hosted Supabase project.
//!
//! The [`form::RegistrationForm`] and [`admin::AdminPanel`] components talk to
//! the table through the [`store::ProviderStore`] trait, so they run the same
//! against the real backend ([`store::PostgrestProviderStore`]) and the
//! in-process [`store::MemoryProviderStore`].

pub mod admin;
pub mod config;
pub mod error;
pub mod fetch;
pub mod form;
pub mod models;
pub mod postgrest;
pub mod store;

use log::info;
use once_cell::sync::OnceCell;
use reqwest::Client;

use crate::config::{ClientOptions, StoreConfig};
use crate::error::{Error, Result};
use crate::postgrest::PostgrestClient;

static GLOBAL: OnceCell<Supabase> = OnceCell::new();

/// Handle to the hosted backend project
pub struct Supabase {
    /// The project configuration
    pub config: StoreConfig,
    /// HTTP client shared by every table client
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
}

impl Supabase {
    /// Create a new handle with default options
    ///
    /// # Example
    ///
    /// ```
    /// use laundry_studio::{config::StoreConfig, Supabase};
    ///
    /// let config = StoreConfig::new("https://your-project.supabase.co", "your-anon-key").unwrap();
    /// let supabase = Supabase::new(config).unwrap();
    /// let table = supabase.from("laundryShops");
    /// ```
    pub fn new(config: StoreConfig) -> Result<Self> {
        Self::new_with_options(config, ClientOptions::default())
    }

    /// Create a new handle with custom options
    pub fn new_with_options(config: StoreConfig, options: ClientOptions) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            config,
            http_client,
            options,
        })
    }

    /// Client for one table of the configured schema
    pub fn from(&self, table: &str) -> PostgrestClient {
        PostgrestClient::new(
            self.config.base_url(),
            &self.config.anon_key,
            &self.options.db_schema,
            table,
            self.http_client.clone(),
        )
    }

    /// Creates the process-wide handle. Fails if it already exists.
    pub fn init_global(config: StoreConfig, options: ClientOptions) -> Result<&'static Supabase> {
        let supabase = Self::new_with_options(config, options)?;
        GLOBAL
            .set(supabase)
            .map_err(|_| Error::config("global client is already initialized"))?;
        let global = Self::global()
            .ok_or_else(|| Error::general("global client vanished after init"))?;
        info!("backend client initialized for {}", global.config.base_url());
        Ok(global)
    }

    /// The process-wide handle, if [`Supabase::init_global`] has run
    pub fn global() -> Option<&'static Supabase> {
        GLOBAL.get()
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::admin::{AdminPanel, AdminState, Alert};
    pub use crate::config::{ClientOptions, StoreConfig};
    pub use crate::error::Error;
    pub use crate::form::{Field, RegistrationForm, SubmitError};
    pub use crate::models::{ProviderRecord, RecordId, ServiceArea, ServiceKind};
    pub use crate::store::{MemoryProviderStore, PostgrestProviderStore, ProviderStore};
    pub use crate::Supabase;
}
