use serde::{Deserialize, Serialize};

use crate::constants;

/// An application known to the storefront, merged from the installed
/// list and the remote registry. Identity is `slug`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub slug: String,
    pub name: String,
    pub description: String,
    /// Icon URL as published by the gateway; fetching is the UI shell's job
    pub icon: String,
    pub version: Option<String>,
    pub installed: bool,
    pub uninstallable: bool,
    pub in_registry: bool,
}

impl App {
    /// Shallow-merge a fetched record into this entry. Only fields the
    /// record explicitly carries overwrite; everything else persists.
    pub fn apply(&mut self, record: AppRecord) {
        debug_assert_eq!(self.slug, record.slug);
        if let Some(name) = record.name {
            self.name = name;
        }
        if let Some(description) = record.description {
            self.description = description;
        }
        if let Some(icon) = record.icon {
            self.icon = icon;
        }
        if let Some(version) = record.version {
            self.version = Some(version);
        }
        if let Some(installed) = record.installed {
            self.installed = installed;
        }
        if let Some(uninstallable) = record.uninstallable {
            self.uninstallable = uninstallable;
        }
        if let Some(in_registry) = record.in_registry {
            self.in_registry = in_registry;
        }
    }
}

/// A partial app as produced by a single gateway fetch.
///
/// Each source only sets the fields it owns, so a later installed fetch
/// overrides registry placeholders without erasing registry-only data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppRecord {
    pub slug: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub version: Option<String>,
    pub installed: Option<bool>,
    pub uninstallable: Option<bool>,
    pub in_registry: Option<bool>,
}

impl AppRecord {
    /// Build a fresh entry for a slug not seen before
    pub fn into_app(self) -> App {
        App {
            name: self.name.unwrap_or_else(|| self.slug.clone()),
            description: self.description.unwrap_or_default(),
            icon: self.icon.unwrap_or_default(),
            version: self.version,
            installed: self.installed.unwrap_or(false),
            uninstallable: self.uninstallable.unwrap_or(true),
            in_registry: self.in_registry.unwrap_or(false),
            slug: self.slug,
        }
    }
}

/// Notice severity
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A user-facing notification entry shown in the status bar
#[derive(Clone, Debug)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    #[allow(dead_code)] // Reserved for a future notice log screen
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Notice::with_level(NoticeLevel::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice::with_level(NoticeLevel::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Notice::with_level(NoticeLevel::Info, text)
    }

    fn with_level(level: NoticeLevel, text: impl Into<String>) -> Self {
        Notice {
            level,
            text: text.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Registry source string for an install request, pinned to the dev
/// channel since that is the channel the registry listing exposes
pub fn registry_source(slug: &str) -> String {
    format!("registry://{}/dev", slug)
}

/// True if the app can currently be installed from the registry
pub fn installable(app: &App) -> bool {
    app.in_registry && !app.installed && !constants::is_hidden(&app.slug)
}
