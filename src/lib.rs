//! # Cirrus Store
//!
//! A terminal storefront for a personal cloud platform.
//!
//! ## Features
//! - Lists installed apps and the remote registry catalog side by side
//! - Installs registry apps and uninstalls removable apps
//! - Protected platform apps are never removable
//! - Localized registry names/descriptions with English fallback
//! - Gateway auth via bearer token from a small YAML config
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - Store Layer (State machine, the single place state mutates)
//! - Gateway Layer (Tokio runtime, reqwest against the cloud's HTTP API)

pub mod config;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod messages;
pub mod models;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::StoreError;
pub use gateway::{GatewayActor, GatewayClient};
pub use messages::{GatewayCommand, GatewayEvent, RenderState, UiEvent};
pub use models::{App, AppRecord, Notice, NoticeLevel};
pub use store::{consolidate, StoreActor, StoreState};
