//! Command handlers - business logic for processing UI events and gateway events

use crate::constants;
use crate::error::StoreError;
use crate::messages::ui_events::AppTab;
use crate::messages::{GatewayCommand, GatewayEvent};
use crate::models::{self, App, AppRecord, Notice};
use crate::store::state::{PendingOp, StoreState};

/// Merge freshly fetched records into the current collection.
///
/// Each record either updates the existing entry with the same slug
/// (shallow merge, absent fields persist) or is appended as a new entry.
/// Order is existing entries first, then new entries in record order; the
/// result never holds two entries with the same slug.
pub fn consolidate(current: &[App], records: Vec<AppRecord>) -> Vec<App> {
    let mut apps: Vec<App> = current.to_vec();
    for record in records {
        match apps.iter_mut().find(|app| app.slug == record.slug) {
            Some(existing) => existing.apply(record),
            None => apps.push(record.into_app()),
        }
    }
    apps
}

impl StoreState {
    // ========================
    // Navigation
    // ========================

    pub fn switch_tab(&mut self, tab: AppTab) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.selected = 0;
        }
        self.detail = None;
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    fn visible_len(&self) -> usize {
        match self.active_tab {
            AppTab::Installed => self.apps.iter().filter(|a| a.installed).count(),
            AppTab::Discover => self.apps.iter().filter(|a| a.in_registry).count(),
        }
    }

    pub fn open_detail(&mut self) {
        if let Some(app) = self.selected_app() {
            self.detail = Some(app.slug);
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Fetching
    // ========================

    /// Start a refresh unless one is already running
    pub fn prepare_fetch(&mut self) -> Option<GatewayCommand> {
        if self.is_fetching {
            return None;
        }

        self.is_fetching = true;
        let id = self.next_id();
        self.pending_fetch_id = Some(id);

        Some(GatewayCommand::FetchApps {
            id,
            lang: self.lang.clone(),
        })
    }

    // ========================
    // Uninstalling
    // ========================

    /// Protected and hidden apps can never be removed
    pub fn check_removable(&self, slug: &str) -> Result<(), StoreError> {
        if constants::is_protected(slug) || constants::is_hidden(slug) {
            return Err(StoreError::NotRemovable(slug.to_string()));
        }
        Ok(())
    }

    /// The app targeted by an action: the open detail page, else the cursor
    fn action_target(&self) -> Option<App> {
        self.detail
            .as_deref()
            .and_then(|slug| self.find(slug))
            .cloned()
            .or_else(|| self.selected_app())
    }

    /// Open the uninstall confirmation, or reject protected apps outright
    pub fn request_uninstall(&mut self) {
        let Some(app) = self.action_target() else {
            return;
        };
        if !app.installed || self.busy() {
            return;
        }

        if let Err(err) = self.check_removable(&app.slug) {
            self.uninstall_error = Some(err.clone());
            self.push_notice(Notice::error(err.to_string()));
            return;
        }

        self.uninstall_dialog = Some(app.slug);
    }

    /// Confirm the open dialog. The removable guard runs again here so no
    /// command is ever produced for a protected slug.
    pub fn confirm_uninstall(&mut self) -> Option<GatewayCommand> {
        let slug = self.uninstall_dialog.take()?;
        if self.busy() {
            return None;
        }

        if let Err(err) = self.check_removable(&slug) {
            self.uninstall_error = Some(err.clone());
            self.push_notice(Notice::error(err.to_string()));
            return None;
        }

        let id = self.next_id();
        self.pending_uninstall = Some(PendingOp {
            id,
            slug: slug.clone(),
        });

        Some(GatewayCommand::UninstallApp { id, slug })
    }

    pub fn cancel_uninstall(&mut self) {
        self.uninstall_dialog = None;
    }

    // ========================
    // Installing
    // ========================

    pub fn request_install(&mut self) -> Option<GatewayCommand> {
        let app = self.action_target()?;
        if !models::installable(&app) || self.busy() {
            return None;
        }

        let id = self.next_id();
        self.pending_install = Some(PendingOp {
            id,
            slug: app.slug.clone(),
        });

        Some(GatewayCommand::InstallApp {
            id,
            source: models::registry_source(&app.slug),
            slug: app.slug,
        })
    }

    pub fn dismiss_install_success(&mut self) {
        self.install_success = None;
    }

    // ========================
    // Gateway event handling
    // ========================

    pub fn handle_event(&mut self, event: GatewayEvent) {
        match event {
            GatewayEvent::RegistryFetched { id, records } => {
                if self.pending_fetch_id == Some(id) {
                    self.apps = consolidate(&self.apps, records);
                    self.clamp_selection();
                }
            }
            GatewayEvent::InstalledFetched { id, records } => {
                if self.pending_fetch_id == Some(id) {
                    self.apps = consolidate(&self.apps, records);
                    self.is_fetching = false;
                    self.fetch_error = None;
                    self.pending_fetch_id = None;
                    self.clamp_selection();
                }
            }
            GatewayEvent::FetchFailed { id, error } => {
                if self.pending_fetch_id == Some(id) {
                    self.is_fetching = false;
                    self.fetch_error = Some(error.clone());
                    self.pending_fetch_id = None;
                    self.push_notice(Notice::error(error.to_string()));
                }
            }

            GatewayEvent::Uninstalled { id, slug } => {
                if self.pending_uninstall.as_ref().map(|op| op.id) == Some(id) {
                    self.pending_uninstall = None;
                    self.uninstall_error = None;
                    // The entry stays in the collection, only the flag flips
                    let name = match self.find_mut(&slug) {
                        Some(app) => {
                            app.installed = false;
                            app.name.clone()
                        }
                        None => slug,
                    };
                    self.push_notice(Notice::success(format!("{} uninstalled", name)));
                    self.clamp_selection();
                }
            }
            GatewayEvent::UninstallFailed { id, slug, error } => {
                if self.pending_uninstall.as_ref().map(|op| op.id) == Some(id) {
                    self.pending_uninstall = None;
                    self.uninstall_error = Some(error.clone());
                    self.push_notice(Notice::error(format!(
                        "could not uninstall {}: {}",
                        slug, error
                    )));
                }
            }

            GatewayEvent::Installed { id, slug, version } => {
                if self.pending_install.as_ref().map(|op| op.id) == Some(id) {
                    self.pending_install = None;
                    self.install_error = None;
                    let name = match self.find_mut(&slug) {
                        Some(app) => {
                            app.installed = true;
                            app.uninstallable = !constants::is_protected(&app.slug);
                            if version.is_some() {
                                app.version = version;
                            }
                            app.name.clone()
                        }
                        None => slug.clone(),
                    };
                    self.install_success = Some(slug);
                    self.push_notice(Notice::success(format!("{} installed", name)));
                    self.clamp_selection();
                }
            }
            GatewayEvent::InstallFailed { id, slug, error } => {
                if self.pending_install.as_ref().map(|op| op.id) == Some(id) {
                    self.pending_install = None;
                    self.install_error = Some(error.clone());
                    self.push_notice(Notice::error(format!(
                        "could not install {}: {}",
                        slug, error
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_record(slug: &str) -> AppRecord {
        AppRecord {
            slug: slug.into(),
            name: Some(format!("{} (registry)", slug)),
            description: Some("from the registry".into()),
            icon: Some(format!("https://registry.example/{}.svg", slug)),
            version: Some("0.9.0".into()),
            installed: Some(false),
            uninstallable: Some(true),
            in_registry: Some(true),
        }
    }

    fn installed_record(slug: &str) -> AppRecord {
        AppRecord {
            slug: slug.into(),
            name: Some(format!("{} (installed)", slug)),
            icon: Some(format!("https://cloud.example/{}/icon", slug)),
            version: Some("1.0.0".into()),
            installed: Some(true),
            uninstallable: Some(!constants::is_protected(slug)),
            ..AppRecord::default()
        }
    }

    fn state_with(records: Vec<AppRecord>) -> StoreState {
        let mut state = StoreState::new("en");
        state.apps = consolidate(&[], records);
        state
    }

    #[test]
    fn test_consolidate_empty_collection() {
        let records = vec![registry_record("notes"), registry_record("photos")];
        let apps = consolidate(&[], records);
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].slug, "notes");
        assert_eq!(apps[1].slug, "photos");
    }

    #[test]
    fn test_consolidate_never_duplicates_slug() {
        let apps = consolidate(&[], vec![registry_record("notes")]);
        let apps = consolidate(&apps, vec![registry_record("notes"), installed_record("notes")]);
        assert_eq!(apps.len(), 1);
    }

    #[test]
    fn test_consolidate_preserves_absent_fields() {
        let apps = consolidate(&[], vec![registry_record("notes")]);
        let apps = consolidate(&apps, vec![installed_record("notes")]);

        let app = &apps[0];
        // installed source owns these
        assert!(app.installed);
        assert_eq!(app.name, "notes (installed)");
        assert_eq!(app.version.as_deref(), Some("1.0.0"));
        // registry-only fields survive
        assert!(app.in_registry);
        assert_eq!(app.description, "from the registry");
    }

    #[test]
    fn test_consolidate_appends_after_existing() {
        let apps = consolidate(&[], vec![registry_record("a"), registry_record("b")]);
        let apps = consolidate(&apps, vec![registry_record("b"), registry_record("c")]);
        let slugs: Vec<&str> = apps.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, ["a", "b", "c"]);
    }

    #[test]
    fn test_fetch_sets_loading_and_blocks_reentry() {
        let mut state = StoreState::new("en");
        let cmd = state.prepare_fetch();
        assert!(matches!(cmd, Some(GatewayCommand::FetchApps { .. })));
        assert!(state.is_fetching);
        // a second refresh while one is pending is a no-op
        assert!(state.prepare_fetch().is_none());
    }

    #[test]
    fn test_fetch_success_clears_error_and_loading() {
        let mut state = StoreState::new("en");
        state.fetch_error = Some(StoreError::UnavailableGateway("boom".into()));

        let Some(GatewayCommand::FetchApps { id, .. }) = state.prepare_fetch() else {
            panic!("expected fetch command");
        };
        state.handle_event(GatewayEvent::RegistryFetched {
            id,
            records: vec![registry_record("notes")],
        });
        assert!(state.is_fetching);

        state.handle_event(GatewayEvent::InstalledFetched {
            id,
            records: vec![installed_record("notes")],
        });
        assert!(!state.is_fetching);
        assert_eq!(state.fetch_error, None);
        assert_eq!(state.apps.len(), 1);
        assert!(state.apps[0].installed);
    }

    #[test]
    fn test_fetch_failure_keeps_collection_and_records_error() {
        let mut state = state_with(vec![installed_record("notes")]);
        let before = state.apps.clone();

        let Some(GatewayCommand::FetchApps { id, .. }) = state.prepare_fetch() else {
            panic!("expected fetch command");
        };
        state.handle_event(GatewayEvent::FetchFailed {
            id,
            error: StoreError::UnavailableGateway("connection refused".into()),
        });

        assert!(!state.is_fetching);
        assert_eq!(state.apps, before);
        assert!(matches!(
            state.fetch_error,
            Some(StoreError::UnavailableGateway(_))
        ));
    }

    #[test]
    fn test_stale_fetch_events_are_ignored() {
        let mut state = StoreState::new("en");
        let Some(GatewayCommand::FetchApps { id, .. }) = state.prepare_fetch() else {
            panic!("expected fetch command");
        };
        state.handle_event(GatewayEvent::InstalledFetched {
            id: id + 100,
            records: vec![installed_record("notes")],
        });
        assert!(state.is_fetching);
        assert!(state.apps.is_empty());
    }

    #[test]
    fn test_protected_uninstall_rejects_without_command() {
        let mut state = state_with(vec![installed_record("files")]);
        state.active_tab = AppTab::Installed;

        state.request_uninstall();
        // no dialog opened, error recorded synchronously
        assert_eq!(state.uninstall_dialog, None);
        assert_eq!(
            state.uninstall_error,
            Some(StoreError::NotRemovable("files".into()))
        );

        // even a dialog forced open never yields a command
        state.uninstall_dialog = Some("files".into());
        assert!(state.confirm_uninstall().is_none());
        assert!(state.pending_uninstall.is_none());
    }

    #[test]
    fn test_uninstall_flow_marks_entry_in_place() {
        let mut state = state_with(vec![registry_record("notes"), installed_record("notes")]);
        state.active_tab = AppTab::Installed;

        state.request_uninstall();
        assert_eq!(state.uninstall_dialog.as_deref(), Some("notes"));

        let Some(GatewayCommand::UninstallApp { id, slug }) = state.confirm_uninstall() else {
            panic!("expected uninstall command");
        };
        assert_eq!(slug, "notes");

        state.handle_event(GatewayEvent::Uninstalled { id, slug });
        let app = state.find("notes").unwrap();
        assert!(!app.installed);
        // entry is kept, not removed
        assert_eq!(state.apps.len(), 1);
        assert_eq!(state.uninstall_error, None);
        assert!(state.pending_uninstall.is_none());
    }

    #[test]
    fn test_uninstall_failure_records_error() {
        let mut state = state_with(vec![installed_record("notes")]);
        state.request_uninstall();
        let Some(GatewayCommand::UninstallApp { id, slug }) = state.confirm_uninstall() else {
            panic!("expected uninstall command");
        };

        state.handle_event(GatewayEvent::UninstallFailed {
            id,
            slug,
            error: StoreError::UnavailableGateway("502".into()),
        });
        assert!(state.find("notes").unwrap().installed);
        assert!(matches!(
            state.uninstall_error,
            Some(StoreError::UnavailableGateway(_))
        ));
    }

    #[test]
    fn test_install_flow_opens_success_dialog() {
        let mut state = state_with(vec![registry_record("photos")]);
        state.active_tab = AppTab::Discover;

        let Some(GatewayCommand::InstallApp { id, slug, source }) = state.request_install() else {
            panic!("expected install command");
        };
        assert_eq!(source, "registry://photos/dev");

        state.handle_event(GatewayEvent::Installed {
            id,
            slug,
            version: Some("1.1.0".into()),
        });
        let app = state.find("photos").unwrap();
        assert!(app.installed);
        assert_eq!(app.version.as_deref(), Some("1.1.0"));
        assert_eq!(state.install_success.as_deref(), Some("photos"));
    }

    #[test]
    fn test_install_rejected_for_already_installed() {
        let mut state = state_with(vec![registry_record("notes"), installed_record("notes")]);
        state.active_tab = AppTab::Discover;
        assert!(state.request_install().is_none());
    }
}
