//! Submit-time validation of a [`FormDraft`]

use std::collections::BTreeMap;

use crate::form::draft::{parse_price, Field, FormDraft, PHONE_LENGTH};
use crate::models::{NewProviderRecord, Service, ServiceArea};

pub const NAME_REQUIRED: &str = "Business name is required";
pub const NAME_HAS_DIGITS: &str = "Business name cannot contain numbers";
pub const PHONE_REQUIRED: &str = "Phone is required";
pub const PHONE_LENGTH_MISMATCH: &str = "Phone number must be 10 digits";
pub const ADDRESS_REQUIRED: &str = "Address is required";
pub const ADDRESS_UNKNOWN: &str = "Address must be one of the listed service areas";
pub const SERVICES_REQUIRED: &str = "At least one service must be selected";
pub const SERVICE_PRICE_INVALID: &str = "Each selected service must have a valid price";

/// Error message per field. A field without an entry has no error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    messages: BTreeMap<Field, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Message for `field`, if any
    pub fn get(&self, field: Field) -> Option<&str> {
        self.messages.get(&field).map(String::as_str)
    }

    /// Sets the message for `field`; an empty message clears it.
    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            self.messages.remove(&field);
        } else {
            self.messages.insert(field, message);
        }
    }

    pub fn clear(&mut self, field: Field) {
        self.messages.remove(&field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.messages.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// Checks every rule and returns all failures at once.
pub fn validate(draft: &FormDraft) -> FieldErrors {
    draft.to_record().err().unwrap_or_default()
}

impl FormDraft {
    /// Shapes the insert payload: selected services in catalog order with
    /// parsed prices, blank email as `None`. Every rule is checked, and any
    /// failure returns the full set of messages instead.
    pub fn to_record(&self) -> Result<NewProviderRecord, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.set(Field::Name, NAME_REQUIRED);
        } else if self.name.chars().any(|c| c.is_ascii_digit()) {
            errors.set(Field::Name, NAME_HAS_DIGITS);
        }

        if self.phone.trim().is_empty() {
            errors.set(Field::Phone, PHONE_REQUIRED);
        } else if self.phone.chars().count() != PHONE_LENGTH
            || !self.phone.chars().all(|c| c.is_ascii_digit())
        {
            errors.set(Field::Phone, PHONE_LENGTH_MISMATCH);
        }

        let address = if self.address.is_empty() {
            errors.set(Field::Address, ADDRESS_REQUIRED);
            None
        } else {
            let area = self.address.parse::<ServiceArea>().ok();
            if area.is_none() {
                errors.set(Field::Address, ADDRESS_UNKNOWN);
            }
            area
        };

        let mut any_selected = false;
        let mut services = Vec::new();
        for (kind, entry) in self.selected_services() {
            any_selected = true;
            match parse_price(&entry.price) {
                Some(price) => services.push(Service::new(kind, price)),
                None => errors.set(Field::Services, SERVICE_PRICE_INVALID),
            }
        }
        if !any_selected {
            errors.set(Field::Services, SERVICES_REQUIRED);
        }

        let email = match self.email.trim() {
            "" => None,
            _ => Some(self.email.clone()),
        };

        match address {
            Some(address) if errors.is_empty() => Ok(NewProviderRecord {
                name: self.name.clone(),
                email,
                phone: self.phone.clone(),
                address,
                services,
            }),
            _ => Err(errors),
        }
    }
}
