//! Render state - data structure sent from Store layer to UI for rendering

use crate::error::StoreError;
use crate::messages::ui_events::{AppTab, PopupFlags};
use crate::models::{App, Notice};

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Tab
    pub active_tab: AppTab,

    // App lists, already split per tab
    pub installed: Vec<App>,
    pub discover: Vec<App>,
    pub selected: usize,

    // Fetch state machine
    pub is_fetching: bool,
    pub fetch_error: Option<StoreError>,

    // Pending install/uninstall
    pub busy: bool,
    pub uninstall_error: Option<StoreError>,
    pub install_error: Option<StoreError>,

    // Notifications
    pub last_notice: Option<Notice>,

    // Popups
    pub detail: Option<App>,
    pub confirm_uninstall: Option<App>,
    pub install_success: Option<App>,
    pub show_help: bool,
}

impl RenderState {
    /// Apps shown on the active tab
    pub fn visible_apps(&self) -> &[App] {
        match self.active_tab {
            AppTab::Installed => &self.installed,
            AppTab::Discover => &self.discover,
        }
    }

    /// Which popups currently capture keyboard input
    pub fn popup_flags(&self) -> PopupFlags {
        PopupFlags {
            help: self.show_help,
            detail: self.detail.is_some(),
            confirm_uninstall: self.confirm_uninstall.is_some(),
            install_success: self.install_success.is_some(),
        }
    }
}
