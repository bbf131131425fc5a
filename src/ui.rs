use ratatui::{prelude::*, widgets::*};

use crate::models::{App, NoticeLevel};

/// Notice level color
pub fn notice_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Error => Color::Red,
        NoticeLevel::Info => Color::Yellow,
    }
}

/// Install-state marker for an app row
pub fn install_state(app: &App) -> (&'static str, Color) {
    if app.installed {
        ("installed", Color::Green)
    } else if app.in_registry {
        ("available", Color::Cyan)
    } else {
        ("-", Color::DarkGray)
    }
}

/// One row of the app list
pub fn app_row(app: &App, selected: bool) -> ListItem<'static> {
    let (state, color) = install_state(app);

    let name_style = if selected {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };

    let version = app
        .version
        .as_deref()
        .map(|v| format!(" {}", v))
        .unwrap_or_default();

    let lock = if app.installed && !app.uninstallable {
        " [locked]"
    } else {
        ""
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("{:<20}", app.name), name_style),
        Span::styled(format!("{:<10}", state), Style::default().fg(color)),
        Span::styled(
            format!("{}{}", app.slug, version),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(lock, Style::default().fg(Color::Red)),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppRecord;

    #[test]
    fn test_install_state_labels() {
        let mut app = AppRecord {
            slug: "notes".into(),
            ..AppRecord::default()
        }
        .into_app();
        assert_eq!(install_state(&app).0, "-");
        app.in_registry = true;
        assert_eq!(install_state(&app).0, "available");
        app.installed = true;
        assert_eq!(install_state(&app).0, "installed");
    }
}
