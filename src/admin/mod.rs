//! Password-gated provider list with delete

mod render;

use log::{error, info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::config::ClientOptions;
use crate::models::{ProviderRecord, RecordId};
use crate::store::ProviderStore;

pub use render::*;

pub const LOAD_ERROR_MESSAGE: &str = "Failed to fetch providers.";

/// Blocking messages the admin view raises
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    #[error("Incorrect password.")]
    IncorrectPassword,

    #[error("Failed to delete provider.")]
    DeleteFailed,

    /// An action that needs the list was attempted before unlocking
    #[error("Admin access is locked.")]
    Locked,
}

/// Where the admin view is in its lifecycle. There is no way back to
/// `Locked` once unlocked.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminState {
    Locked,
    Loading,
    Loaded(Vec<ProviderRecord>),
    LoadError(String),
}

impl AdminState {
    pub fn is_locked(&self) -> bool {
        matches!(self, AdminState::Locked)
    }

    pub fn providers(&self) -> Option<&[ProviderRecord]> {
        match self {
            AdminState::Loaded(providers) => Some(providers.as_slice()),
            _ => None,
        }
    }
}

/// Usability gate in front of the list.
///
/// The password lives in the client, so this is not access control. A
/// real deployment must verify credentials on the server.
#[derive(Debug, Clone)]
pub struct AdminGate {
    password: String,
}

impl AdminGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    pub fn check(&self, attempt: &str) -> bool {
        attempt == self.password
    }
}

/// The admin list view bound to a store
pub struct AdminPanel {
    store: Arc<dyn ProviderStore>,
    gate: AdminGate,
    state: AdminState,
}

impl AdminPanel {
    pub fn new(store: Arc<dyn ProviderStore>) -> Self {
        Self::with_options(store, &ClientOptions::default())
    }

    pub fn with_options(store: Arc<dyn ProviderStore>, options: &ClientOptions) -> Self {
        Self {
            store,
            gate: AdminGate::new(options.admin_password.clone()),
            state: AdminState::Locked,
        }
    }

    pub fn state(&self) -> &AdminState {
        &self.state
    }

    /// Unlocks and loads the list when `password` matches. A mismatch
    /// leaves the view locked and makes no store call.
    pub async fn login(&mut self, password: &str) -> Result<(), Alert> {
        if !self.state.is_locked() {
            return Ok(());
        }
        if !self.gate.check(password) {
            warn!("admin login rejected");
            return Err(Alert::IncorrectPassword);
        }
        info!("admin view unlocked");
        self.load().await;
        Ok(())
    }

    /// Refetches every record. Fetch failures land in
    /// [`AdminState::LoadError`] rather than the return value.
    pub async fn refresh(&mut self) -> Result<(), Alert> {
        if self.state.is_locked() {
            return Err(Alert::Locked);
        }
        self.load().await;
        Ok(())
    }

    async fn load(&mut self) {
        self.state = AdminState::Loading;
        self.state = match self.store.select_all().await {
            Ok(providers) => {
                info!("loaded {} providers", providers.len());
                AdminState::Loaded(providers)
            }
            Err(e) => {
                error!("Fetch error: {}", e);
                AdminState::LoadError(LOAD_ERROR_MESSAGE.to_string())
            }
        };
    }

    /// Deletes one record. On success the matching entry leaves the list
    /// without a refetch; on failure the list is untouched.
    pub async fn delete(&mut self, id: &RecordId) -> Result<(), Alert> {
        if self.state.is_locked() {
            return Err(Alert::Locked);
        }
        if let Err(e) = self.store.delete_by_id(id).await {
            error!("Delete error: {}", e);
            return Err(Alert::DeleteFailed);
        }
        if let AdminState::Loaded(providers) = &mut self.state {
            providers.retain(|provider| &provider.id != id);
        }
        Ok(())
    }

    /// Text of the current view
    pub fn render(&self) -> String {
        match &self.state {
            AdminState::Locked => LOCKED_TEXT.to_string(),
            AdminState::Loading => LOADING_TEXT.to_string(),
            AdminState::LoadError(message) => message.clone(),
            AdminState::Loaded(providers) => render_list(providers),
        }
    }
}
