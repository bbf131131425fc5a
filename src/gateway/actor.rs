//! Gateway actor - runs remote operations in the Tokio async runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::gateway::client::GatewayClient;
use crate::messages::{GatewayCommand, GatewayEvent};

/// Gateway actor that processes store commands as spawned tasks
pub struct GatewayActor {
    client: GatewayClient,
    event_tx: mpsc::UnboundedSender<GatewayEvent>,
    tasks: JoinSet<()>,
}

impl GatewayActor {
    pub fn new(client: GatewayClient, event_tx: mpsc::UnboundedSender<GatewayEvent>) -> Self {
        GatewayActor {
            client,
            event_tx,
            tasks: JoinSet::new(),
        }
    }

    /// Run the gateway actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<GatewayCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(GatewayCommand::FetchApps { id, lang }) => {
                            let client = self.client.clone();
                            let event_tx = self.event_tx.clone();
                            self.tasks.spawn(async move {
                                tracing::info!(id, %lang, "fetching apps");
                                fetch_apps(client, id, lang, event_tx).await;
                            });
                        }

                        Some(GatewayCommand::UninstallApp { id, slug }) => {
                            let client = self.client.clone();
                            let event_tx = self.event_tx.clone();
                            self.tasks.spawn(async move {
                                tracing::info!(id, %slug, "uninstalling app");
                                let event = match client.uninstall_app(&slug).await {
                                    Ok(()) => GatewayEvent::Uninstalled { id, slug },
                                    Err(error) => {
                                        tracing::warn!(id, %slug, %error, "uninstall failed");
                                        GatewayEvent::UninstallFailed { id, slug, error }
                                    }
                                };
                                let _ = event_tx.send(event);
                            });
                        }

                        Some(GatewayCommand::InstallApp { id, slug, source }) => {
                            let client = self.client.clone();
                            let event_tx = self.event_tx.clone();
                            self.tasks.spawn(async move {
                                tracing::info!(id, %slug, %source, "installing app");
                                let event = match client.install_app(&slug, &source).await {
                                    Ok(version) => GatewayEvent::Installed { id, slug, version },
                                    Err(error) => {
                                        tracing::warn!(id, %slug, %error, "install failed");
                                        GatewayEvent::InstallFailed { id, slug, error }
                                    }
                                };
                                let _ = event_tx.send(event);
                            });
                        }

                        Some(GatewayCommand::Shutdown) => break,

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.tasks.join_next() => {
                    // Task completed - events were already sent by the task itself
                }
            }
        }
    }
}

/// One full fetch: registry first, then installed apps, so installed data
/// overrides registry placeholders for slugs present in both
async fn fetch_apps(
    client: GatewayClient,
    id: u64,
    lang: String,
    event_tx: mpsc::UnboundedSender<GatewayEvent>,
) {
    match client.fetch_registry_apps(&lang).await {
        Ok(records) => {
            tracing::info!(id, count = records.len(), "registry apps fetched");
            let _ = event_tx.send(GatewayEvent::RegistryFetched { id, records });
        }
        Err(error) => {
            tracing::warn!(id, %error, "registry fetch failed");
            let _ = event_tx.send(GatewayEvent::FetchFailed { id, error });
            return;
        }
    }

    match client.fetch_installed_apps().await {
        Ok(records) => {
            tracing::info!(id, count = records.len(), "installed apps fetched");
            let _ = event_tx.send(GatewayEvent::InstalledFetched { id, records });
        }
        Err(error) => {
            tracing::warn!(id, %error, "installed fetch failed");
            let _ = event_tx.send(GatewayEvent::FetchFailed { id, error });
        }
    }
}
