//! Plain-text rendering of the provider list

use std::fmt::Write;

use crate::models::{ProviderRecord, Service};

pub const LOCKED_TEXT: &str = "Admin access is locked. Enter the admin password.";
pub const LOADING_TEXT: &str = "Loading providers...";
pub const EMPTY_LIST_TEXT: &str = "No providers registered.";
pub const NO_SERVICES_TEXT: &str = "No services listed";
pub const MISSING_EMAIL_TEXT: &str = "N/A";

/// `"{name} - ₹{price}"`; whole prices print without a fraction. A stored
/// service without a price shows its name alone.
pub fn format_service(service: &Service) -> String {
    match service.price {
        Some(price) => format!("{} - ₹{}", service.name, price),
        None => service.name.clone(),
    }
}

pub fn render_provider(provider: &ProviderRecord) -> String {
    let email = provider
        .email
        .as_deref()
        .filter(|email| !email.is_empty())
        .unwrap_or(MISSING_EMAIL_TEXT);

    let mut out = String::new();
    let _ = writeln!(out, "{}", provider.name);
    let _ = writeln!(out, "Phone: {}", provider.phone);
    let _ = writeln!(out, "Email: {}", email);
    let _ = writeln!(out, "Address: {}", provider.address);
    out.push_str("Services:\n");
    if provider.services.is_empty() {
        let _ = writeln!(out, "  {}", NO_SERVICES_TEXT);
    } else {
        for service in &provider.services {
            let _ = writeln!(out, "  - {}", format_service(service));
        }
    }
    let _ = writeln!(out, "[id {}]", provider.id);
    out
}

pub fn render_list(providers: &[ProviderRecord]) -> String {
    if providers.is_empty() {
        return EMPTY_LIST_TEXT.to_string();
    }
    providers
        .iter()
        .map(render_provider)
        .collect::<Vec<_>>()
        .join("\n")
}
