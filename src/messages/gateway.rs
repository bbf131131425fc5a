//! Gateway messages - communication between Store and Gateway layers

use crate::error::StoreError;
use crate::models::AppRecord;

/// Commands sent from the Store layer to the Gateway layer
#[derive(Debug, Clone)]
pub enum GatewayCommand {
    /// Fetch the full app picture: registry first, then installed apps,
    /// sequentially, so installed data lands on top
    FetchApps { id: u64, lang: String },
    /// Remove an installed app
    UninstallApp { id: u64, slug: String },
    /// Install an app from the registry
    InstallApp {
        id: u64,
        slug: String,
        source: String,
    },
    /// Shutdown the gateway actor
    Shutdown,
}

/// Events sent from the Gateway layer back to the Store layer
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// Registry catalog fetched (first phase of a fetch)
    RegistryFetched { id: u64, records: Vec<AppRecord> },
    /// Installed apps fetched (terminal phase of a successful fetch)
    InstalledFetched { id: u64, records: Vec<AppRecord> },
    /// A fetch failed at whichever phase was running
    FetchFailed { id: u64, error: StoreError },

    /// Uninstall completed
    Uninstalled { id: u64, slug: String },
    /// Uninstall failed
    UninstallFailed {
        id: u64,
        slug: String,
        error: StoreError,
    },

    /// Install completed; version as reported by the gateway, when present
    Installed {
        id: u64,
        slug: String,
        version: Option<String>,
    },
    /// Install failed
    InstallFailed {
        id: u64,
        slug: String,
        error: StoreError,
    },
}

impl GatewayEvent {
    /// Get the originating request ID
    pub fn id(&self) -> u64 {
        match self {
            GatewayEvent::RegistryFetched { id, .. } => *id,
            GatewayEvent::InstalledFetched { id, .. } => *id,
            GatewayEvent::FetchFailed { id, .. } => *id,
            GatewayEvent::Uninstalled { id, .. } => *id,
            GatewayEvent::UninstallFailed { id, .. } => *id,
            GatewayEvent::Installed { id, .. } => *id,
            GatewayEvent::InstallFailed { id, .. } => *id,
        }
    }

    /// Check if this is a terminal event (no more messages expected for this id)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GatewayEvent::RegistryFetched { .. })
    }
}
