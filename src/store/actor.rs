//! Store actor - message loop processing UI events and gateway events

use tokio::sync::mpsc;

use crate::messages::{GatewayCommand, GatewayEvent, RenderState, UiEvent};
use crate::models::Notice;
use crate::store::state::StoreState;

/// Store actor that processes UI events and gateway events
pub struct StoreActor {
    state: StoreState,
    gateway_tx: mpsc::UnboundedSender<GatewayCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl StoreActor {
    pub fn new(
        state: StoreState,
        gateway_tx: mpsc::UnboundedSender<GatewayCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        StoreActor {
            state,
            gateway_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut gw_rx: mpsc::UnboundedReceiver<GatewayEvent>,
    ) {
        // Kick off the first fetch so the storefront is populated on start
        if let Some(cmd) = self.state.prepare_fetch() {
            let _ = self.gateway_tx.send(cmd);
        }
        self.state.push_notice(Notice::info("Press ? for help"));
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.gateway_tx.send(GatewayCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(event) = gw_rx.recv() => {
                    tracing::debug!(id = event.id(), terminal = event.is_terminal(), "gateway event");
                    self.state.handle_event(event);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Tab navigation
            UiEvent::SwitchTab(tab) => self.state.switch_tab(tab),

            // List navigation
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::OpenDetail => self.state.open_detail(),
            UiEvent::CloseDetail => self.state.close_detail(),

            // Store actions
            UiEvent::Refresh => {
                if let Some(cmd) = self.state.prepare_fetch() {
                    let _ = self.gateway_tx.send(cmd);
                }
            }
            UiEvent::RequestUninstall => self.state.request_uninstall(),
            UiEvent::ConfirmUninstall => {
                if let Some(cmd) = self.state.confirm_uninstall() {
                    let _ = self.gateway_tx.send(cmd);
                }
            }
            UiEvent::CancelUninstall => self.state.cancel_uninstall(),
            UiEvent::RequestInstall => {
                if let Some(cmd) = self.state.request_install() {
                    let _ = self.gateway_tx.send(cmd);
                }
            }
            UiEvent::DismissInstallSuccess => self.state.dismiss_install_success(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
