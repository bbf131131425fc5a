//! UI events - messages from UI layer to Store layer

use crossterm::event::{KeyCode, KeyEvent};

/// Storefront tabs
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AppTab {
    #[default]
    Installed,
    Discover,
}

impl AppTab {
    pub fn next(&self) -> AppTab {
        match self {
            AppTab::Installed => AppTab::Discover,
            AppTab::Discover => AppTab::Installed,
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Tab navigation
    SwitchTab(AppTab),

    // List navigation
    SelectNext,
    SelectPrev,
    OpenDetail,
    CloseDetail,

    // Store actions
    Refresh,
    RequestUninstall,
    ConfirmUninstall,
    CancelUninstall,
    RequestInstall,
    DismissInstallSuccess,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Flags describing which popup currently captures input
#[derive(Clone, Copy, Debug, Default)]
pub struct PopupFlags {
    pub help: bool,
    pub detail: bool,
    pub confirm_uninstall: bool,
    pub install_success: bool,
}

/// Translate a key event into a UI event, honoring open popups
pub fn key_to_ui_event(key: KeyEvent, tab: AppTab, popups: PopupFlags) -> Option<UiEvent> {
    // Popups capture input first
    if popups.help {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(UiEvent::CloseHelp),
            _ => None,
        };
    }

    if popups.confirm_uninstall {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(UiEvent::ConfirmUninstall),
            KeyCode::Char('n') | KeyCode::Esc => Some(UiEvent::CancelUninstall),
            _ => None,
        };
    }

    if popups.install_success {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc => Some(UiEvent::DismissInstallSuccess),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),

        KeyCode::Char('1') => Some(UiEvent::SwitchTab(AppTab::Installed)),
        KeyCode::Char('2') => Some(UiEvent::SwitchTab(AppTab::Discover)),
        KeyCode::Tab => Some(UiEvent::SwitchTab(tab.next())),

        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Enter => Some(UiEvent::OpenDetail),
        KeyCode::Esc if popups.detail => Some(UiEvent::CloseDetail),

        KeyCode::Char('r') => Some(UiEvent::Refresh),
        KeyCode::Char('u') => Some(UiEvent::RequestUninstall),
        KeyCode::Char('i') => Some(UiEvent::RequestInstall),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_confirm_popup_captures_keys() {
        let popups = PopupFlags {
            confirm_uninstall: true,
            ..PopupFlags::default()
        };
        assert!(matches!(
            key_to_ui_event(key(KeyCode::Char('y')), AppTab::Installed, popups),
            Some(UiEvent::ConfirmUninstall)
        ));
        assert!(matches!(
            key_to_ui_event(key(KeyCode::Esc), AppTab::Installed, popups),
            Some(UiEvent::CancelUninstall)
        ));
        // list navigation is suppressed while the dialog is open
        assert!(key_to_ui_event(key(KeyCode::Char('j')), AppTab::Installed, popups).is_none());
    }

    #[test]
    fn test_tab_cycles() {
        let event = key_to_ui_event(key(KeyCode::Tab), AppTab::Installed, PopupFlags::default());
        assert!(matches!(event, Some(UiEvent::SwitchTab(AppTab::Discover))));
    }
}
