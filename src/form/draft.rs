//! Editable form state and the per-keystroke input filters

use std::collections::BTreeMap;
use std::fmt;

use crate::models::ServiceKind;

/// Longest phone number the form accepts
pub const PHONE_LENGTH: usize = 10;

/// Form fields that can carry an error message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Phone,
    Address,
    Services,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::Services => "services",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkbox and price input for one catalog entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceEntry {
    pub selected: bool,
    pub price: String,
}

/// Keeps digits only, truncated to the first ten.
pub fn filter_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_LENGTH)
        .collect()
}

/// Keeps ASCII letters and whitespace.
pub fn filter_name(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect()
}

/// Parses a price input; `None` for blank, non-numeric, negative or
/// non-finite text.
pub fn parse_price(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price >= 0.0)
}

/// Transient client state behind the registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Raw value of the area picker; empty while nothing is chosen
    pub address: String,
    pub services: BTreeMap<ServiceKind, ServiceEntry>,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            services: ServiceKind::ALL
                .into_iter()
                .map(|kind| (kind, ServiceEntry::default()))
                .collect(),
        }
    }
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` into a text field, applying the live filter for
    /// name and phone. `Field::Services` is not a text field and is ignored.
    pub fn set(&mut self, field: Field, value: &str) {
        match field {
            Field::Name => self.name = filter_name(value),
            Field::Phone => self.phone = filter_phone(value),
            Field::Email => self.email = value.to_string(),
            Field::Address => self.address = value.to_string(),
            Field::Services => {}
        }
    }

    pub fn service(&self, kind: ServiceKind) -> Option<&ServiceEntry> {
        self.services.get(&kind)
    }

    pub fn service_mut(&mut self, kind: ServiceKind) -> &mut ServiceEntry {
        self.services.entry(kind).or_default()
    }

    /// Selected entries in catalog order
    pub fn selected_services(&self) -> impl Iterator<Item = (ServiceKind, &ServiceEntry)> {
        self.services
            .iter()
            .filter(|(_, entry)| entry.selected)
            .map(|(kind, entry)| (*kind, entry))
    }
}
