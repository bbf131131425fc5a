//! Cirrus Store - terminal storefront for a personal cloud
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - Store Layer - central state machine processing events
//! - Gateway Layer (Tokio) - async HTTP calls against the cloud gateway

mod config;
mod constants;
mod error;
mod gateway;
mod messages;
mod models;
mod store;
mod ui;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use config::Config;
use gateway::{GatewayActor, GatewayClient};
use messages::ui_events::key_to_ui_event;
use messages::{GatewayCommand, GatewayEvent, RenderState, UiEvent};
use models::App;
use store::{StoreActor, StoreState};
use ui::{app_row, notice_color};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", "cirrus-store.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = Config::load();
    tracing::info!(gateway = %config.gateway_url, lang = %config.lang, "starting");

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (gw_cmd_tx, gw_cmd_rx) = mpsc::unbounded_channel::<GatewayCommand>();
    let (gw_event_tx, gw_event_rx) = mpsc::unbounded_channel::<GatewayEvent>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn gateway actor
    let gateway_actor = GatewayActor::new(GatewayClient::new(&config), gw_event_tx);
    tokio::spawn(gateway_actor.run(gw_cmd_rx));

    // Spawn store actor
    let store_actor = StoreActor::new(StoreState::new(config.lang), gw_cmd_tx, render_tx);
    tokio::spawn(store_actor.run(ui_rx, gw_event_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) =
                    key_to_ui_event(key, current_state.active_tab, current_state.popup_flags())
                {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    // Main layout with tab bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // App list
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);
    draw_app_list(f, state, main_chunks[1]);
    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    if let Some(app) = &state.detail {
        draw_detail_popup(f, app, area);
    }

    if let Some(app) = &state.confirm_uninstall {
        draw_confirm_popup(f, app, area);
    }

    if let Some(app) = &state.install_success {
        draw_install_success_popup(f, app, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    use crate::messages::ui_events::AppTab;

    let tabs = vec![
        Span::styled(
            format!(" 1:Installed ({}) ", state.installed.len()),
            if state.active_tab == AppTab::Installed {
                Style::default().fg(Color::Black).bg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            },
        ),
        Span::raw(" "),
        Span::styled(
            format!(" 2:Discover ({}) ", state.discover.len()),
            if state.active_tab == AppTab::Discover {
                Style::default().fg(Color::Black).bg(Color::Magenta).bold()
            } else {
                Style::default().fg(Color::Gray)
            },
        ),
        Span::styled(
            if state.is_fetching { " [...]" } else { "" },
            Style::default().fg(Color::Yellow),
        ),
    ];

    let tab_line = Line::from(tabs);
    f.render_widget(Paragraph::new(tab_line), area);
}

fn draw_app_list(f: &mut Frame, state: &RenderState, area: Rect) {
    use crate::messages::ui_events::AppTab;

    let apps = state.visible_apps();

    let title = match state.active_tab {
        AppTab::Installed => " My Apps (Enter:open u:uninstall r:refresh) ",
        AppTab::Discover => " Discover (Enter:open i:install r:refresh) ",
    };

    let block = Block::default().borders(Borders::ALL).title(title);

    if apps.is_empty() {
        let message = if let Some(error) = &state.fetch_error {
            Line::from(Span::styled(
                format!("Could not reach your cloud: {}", error),
                Style::default().fg(Color::Red),
            ))
        } else if state.is_fetching {
            Line::from(Span::styled(
                "Fetching apps...",
                Style::default().fg(Color::Yellow),
            ))
        } else {
            Line::from(Span::styled(
                "Nothing here yet. Press 'r' to refresh.",
                Style::default().fg(Color::DarkGray),
            ))
        };

        let paragraph = Paragraph::new(message)
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = apps
        .iter()
        .enumerate()
        .map(|(i, app)| app_row(app, i == state.selected))
        .collect();

    let list = List::new(items).block(block);

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));

    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = if state.busy {
        " Working... "
    } else if state.is_fetching {
        " Fetching apps... "
    } else {
        " Tab:switch | Enter:details | i:install | u:uninstall | r:refresh | ?:help | q:quit "
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(Color::DarkGray))];

    if let Some(notice) = &state.last_notice {
        spans.push(Span::styled(
            format!(" {} ", notice.text),
            Style::default().fg(notice_color(notice.level)).bold(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_detail_popup(f: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(70, 70, area);

    let (state_label, state_color) = ui::install_state(app);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Slug     ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.slug.clone()),
        ]),
        Line::from(vec![
            Span::styled("Version  ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.version.clone().unwrap_or_else(|| "-".into())),
        ]),
        Line::from(vec![
            Span::styled("State    ", Style::default().fg(Color::DarkGray)),
            Span::styled(state_label, Style::default().fg(state_color)),
        ]),
        Line::from(vec![
            Span::styled("Icon     ", Style::default().fg(Color::DarkGray)),
            Span::raw(if app.icon.is_empty() {
                "-".to_string()
            } else {
                app.icon.clone()
            }),
        ]),
        Line::from(""),
    ];

    if app.description.is_empty() {
        lines.push(Line::from(Span::styled(
            "No description published.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for text_line in app.description.lines() {
            lines.push(Line::from(text_line.to_string()));
        }
    }

    lines.push(Line::from(""));
    let action = if app.installed && app.uninstallable {
        "u:uninstall | Esc:close"
    } else if app.installed {
        "protected app | Esc:close"
    } else {
        "i:install | Esc:close"
    };
    lines.push(Line::from(Span::styled(
        action,
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.name))
        .style(Style::default().bg(Color::Black));

    let detail = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(detail, popup_area);
}

fn draw_confirm_popup(f: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(50, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Uninstall ")
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let lines = vec![
        Line::from(""),
        Line::from(format!("Remove {} from your cloud?", app.name)),
        Line::from(""),
        Line::from(Span::styled(
            "y:confirm | n:cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let confirm = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(confirm, popup_area);
}

fn draw_install_success_popup(f: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect(50, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Installed ")
        .border_style(Style::default().fg(Color::Green))
        .style(Style::default().bg(Color::Black));

    let lines = vec![
        Line::from(""),
        Line::from(format!("{} is now available on your cloud!", app.name)),
        Line::from(""),
        Line::from(Span::styled(
            "Enter:close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let success = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(success, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 CIRRUS STORE - Keyboard Shortcuts

 NAVIGATION
   1 / 2              Installed / Discover tab
   Tab                Switch tabs
   Up/Down or j/k     Move selection
   Enter              Open app details
   Esc                Close details / dialogs

 STORE
   r                  Refresh apps from your cloud
   i                  Install the selected registry app
   u                  Uninstall the selected app
   y / n              Confirm / cancel an uninstall

 GENERAL
   ?                  Toggle this help
   q                  Quit

 Press ? or Esc to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
