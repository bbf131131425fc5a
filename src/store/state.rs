//! Store state - pure data structure with no I/O logic

use std::collections::VecDeque;

use crate::error::StoreError;
use crate::messages::ui_events::AppTab;
use crate::messages::RenderState;
use crate::models::{App, Notice};

const MAX_NOTICES: usize = 20;

/// A remote operation the store is waiting on
#[derive(Clone, Debug, PartialEq)]
pub struct PendingOp {
    pub id: u64,
    pub slug: String,
}

/// Main storefront state - pure data, mutated only by the store actor
pub struct StoreState {
    // Tab navigation
    pub active_tab: AppTab,

    // Merged collection of installed + registry apps, deduplicated by slug
    pub apps: Vec<App>,
    pub selected: usize,

    // Fetch state machine
    pub is_fetching: bool,
    pub fetch_error: Option<StoreError>,
    pub pending_fetch_id: Option<u64>,

    // Install / uninstall tracking
    pub pending_uninstall: Option<PendingOp>,
    pub pending_install: Option<PendingOp>,
    pub uninstall_error: Option<StoreError>,
    pub install_error: Option<StoreError>,

    pub next_request_id: u64,

    // Language for localized registry fields
    pub lang: String,

    // Notifications, newest first
    pub notices: VecDeque<Notice>,

    // Popups (slugs, resolved against the collection at render time)
    pub detail: Option<String>,
    pub uninstall_dialog: Option<String>,
    pub install_success: Option<String>,
    pub show_help: bool,
}

impl StoreState {
    pub fn new(lang: impl Into<String>) -> Self {
        StoreState {
            active_tab: AppTab::Installed,
            apps: Vec::new(),
            selected: 0,
            is_fetching: false,
            fetch_error: None,
            pending_fetch_id: None,
            pending_uninstall: None,
            pending_install: None,
            uninstall_error: None,
            install_error: None,
            next_request_id: 1,
            lang: lang.into(),
            notices: VecDeque::with_capacity(MAX_NOTICES),
            detail: None,
            uninstall_dialog: None,
            install_success: None,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Find an app by slug
    pub fn find(&self, slug: &str) -> Option<&App> {
        self.apps.iter().find(|app| app.slug == slug)
    }

    pub fn find_mut(&mut self, slug: &str) -> Option<&mut App> {
        self.apps.iter_mut().find(|app| app.slug == slug)
    }

    /// Apps shown on the Installed tab
    pub fn installed_apps(&self) -> Vec<App> {
        self.apps.iter().filter(|a| a.installed).cloned().collect()
    }

    /// Apps shown on the Discover tab
    pub fn registry_apps(&self) -> Vec<App> {
        self.apps
            .iter()
            .filter(|a| a.in_registry)
            .cloned()
            .collect()
    }

    /// The app currently under the cursor on the active tab
    pub fn selected_app(&self) -> Option<App> {
        let apps = match self.active_tab {
            AppTab::Installed => self.installed_apps(),
            AppTab::Discover => self.registry_apps(),
        };
        apps.get(self.selected).cloned()
    }

    /// Keep the cursor inside the visible list after collection changes
    pub fn clamp_selection(&mut self) {
        let len = match self.active_tab {
            AppTab::Installed => self.apps.iter().filter(|a| a.installed).count(),
            AppTab::Discover => self.apps.iter().filter(|a| a.in_registry).count(),
        };
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// True while an install or uninstall is in flight
    pub fn busy(&self) -> bool {
        self.pending_uninstall.is_some() || self.pending_install.is_some()
    }

    pub fn push_notice(&mut self, notice: Notice) {
        if self.notices.len() >= MAX_NOTICES {
            self.notices.pop_back();
        }
        self.notices.push_front(notice);
    }

    /// Convert state to RenderState for the UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            active_tab: self.active_tab,
            installed: self.installed_apps(),
            discover: self.registry_apps(),
            selected: self.selected,
            is_fetching: self.is_fetching,
            fetch_error: self.fetch_error.clone(),
            busy: self.busy(),
            uninstall_error: self.uninstall_error.clone(),
            install_error: self.install_error.clone(),
            last_notice: self.notices.front().cloned(),
            detail: self.detail.as_deref().and_then(|s| self.find(s)).cloned(),
            confirm_uninstall: self
                .uninstall_dialog
                .as_deref()
                .and_then(|s| self.find(s))
                .cloned(),
            install_success: self
                .install_success
                .as_deref()
                .and_then(|s| self.find(s))
                .cloned(),
            show_help: self.show_help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppRecord;

    fn installed_app(slug: &str) -> App {
        AppRecord {
            slug: slug.into(),
            installed: Some(true),
            ..AppRecord::default()
        }
        .into_app()
    }

    #[test]
    fn test_notices_are_capped_newest_first() {
        let mut state = StoreState::new("en");
        for i in 0..30 {
            state.push_notice(Notice::info(format!("notice {}", i)));
        }
        assert_eq!(state.notices.len(), 20);
        assert_eq!(state.notices.front().unwrap().text, "notice 29");
        assert_eq!(state.notices.back().unwrap().text, "notice 10");
    }

    #[test]
    fn test_clamp_selection_after_shrink() {
        let mut state = StoreState::new("en");
        state.apps = vec![installed_app("a"), installed_app("b"), installed_app("c")];
        state.selected = 2;

        state.apps.truncate(1);
        state.clamp_selection();
        assert_eq!(state.selected, 0);

        state.apps.clear();
        state.clamp_selection();
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_render_state_resolves_dialog_slugs() {
        let mut state = StoreState::new("en");
        state.apps = vec![installed_app("notes")];
        state.detail = Some("notes".into());
        state.uninstall_dialog = Some("gone".into());

        let render = state.to_render_state();
        assert_eq!(render.detail.as_ref().map(|a| a.slug.as_str()), Some("notes"));
        // a slug no longer in the collection simply resolves to no popup
        assert!(render.confirm_uninstall.is_none());
        assert_eq!(render.installed.len(), 1);
        assert!(render.discover.is_empty());
    }
}
