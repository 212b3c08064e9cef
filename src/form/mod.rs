//! Provider registration form: live input filtering, validation and submit

mod draft;
mod validate;

use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::ClientOptions;
use crate::models::{RecordId, ServiceKind};
use crate::store::ProviderStore;

pub use draft::*;
pub use validate::*;

pub const SUCCESS_MESSAGE: &str = "Provider registered successfully!";
pub const FAILURE_MESSAGE: &str = "Failed to register provider. Please try again.";

/// Why a submit did not produce a record
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The draft failed validation; nothing was sent
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    /// The store rejected the insert
    #[error("registration failed: {0}")]
    Remote(#[from] crate::error::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// Banner shown above the form after a submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// When the notice disappears; `None` keeps it until the next submit
    pub expires_at: Option<Instant>,
}

impl Notice {
    fn is_visible(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| now < deadline)
    }
}

/// The registration form bound to a store
pub struct RegistrationForm {
    store: Arc<dyn ProviderStore>,
    draft: FormDraft,
    errors: FieldErrors,
    notice: Option<Notice>,
    notice_duration: Duration,
}

impl RegistrationForm {
    pub fn new(store: Arc<dyn ProviderStore>) -> Self {
        Self::with_options(store, &ClientOptions::default())
    }

    pub fn with_options(store: Arc<dyn ProviderStore>, options: &ClientOptions) -> Self {
        Self {
            store,
            draft: FormDraft::new(),
            errors: FieldErrors::new(),
            notice: None,
            notice_duration: options.notice_duration,
        }
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// The current notice, unless its display time has run out
    pub fn notice(&self) -> Option<&Notice> {
        let now = Instant::now();
        self.notice.as_ref().filter(|notice| notice.is_visible(now))
    }

    /// Text input change. Filters the value and clears the field's error.
    pub fn set_field(&mut self, field: Field, value: &str) {
        self.draft.set(field, value);
        self.errors.clear(field);
    }

    pub fn set_service_selected(&mut self, kind: ServiceKind, selected: bool) {
        self.draft.service_mut(kind).selected = selected;
        self.errors.clear(Field::Services);
    }

    pub fn set_service_price(&mut self, kind: ServiceKind, price: &str) {
        self.draft.service_mut(kind).price = price.to_string();
        self.errors.clear(Field::Services);
    }

    /// Returns the draft and its errors to their initial empty state.
    /// A visible notice is left alone.
    pub fn reset(&mut self) {
        self.draft = FormDraft::new();
        self.errors = FieldErrors::new();
    }

    /// Validates and, if the draft is valid, sends exactly one insert.
    pub async fn submit(&mut self) -> Result<RecordId, SubmitError> {
        let record = match self.draft.to_record() {
            Ok(record) => record,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
        };
        self.errors = FieldErrors::new();

        match self.store.insert(&record).await {
            Ok(id) => {
                info!("registered provider {} as {}", record.name, id);
                self.notice = Some(Notice {
                    kind: NoticeKind::Success,
                    message: SUCCESS_MESSAGE.to_string(),
                    expires_at: Some(Instant::now() + self.notice_duration),
                });
                self.reset();
                Ok(id)
            }
            Err(e) => {
                error!("Error submitting form: {}", e);
                self.notice = Some(Notice {
                    kind: NoticeKind::Failure,
                    message: FAILURE_MESSAGE.to_string(),
                    expires_at: None,
                });
                Err(SubmitError::Remote(e))
            }
        }
    }
}
