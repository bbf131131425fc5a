//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default gateway base URL when no config file is present
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

/// Default language for localized registry fields
pub const DEFAULT_LANG: &str = "en";

/// Apps that must never be uninstalled
pub const PROTECTED_SLUGS: &[&str] = &["files", "mail"];

/// Platform apps hidden from the storefront
pub const HIDDEN_SLUGS: &[&str] = &["settings", "store", "onboarding"];

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "Cirrus Store";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// True if the slug is on the protected (non-removable) list
pub fn is_protected(slug: &str) -> bool {
    PROTECTED_SLUGS.contains(&slug)
}

/// True if the slug belongs to a hidden platform app
pub fn is_hidden(slug: &str) -> bool {
    HIDDEN_SLUGS.contains(&slug)
}
