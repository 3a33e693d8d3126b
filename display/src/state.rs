use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use common::clock::SystemClock;
use common::config::Settings;
use common::errors::RefreshError;
use common::scheduler::{RefreshScheduler, ReloadStrategy};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub scheduler: Arc<RefreshScheduler>,
    pub reload_tx: broadcast::Sender<ReloadCommand>,
}

/// Reload command pushed to connected displays
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReloadCommand {
    pub bypass_cache: bool,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(settings: Settings) -> Self {
        let (reload_tx, _) = broadcast::channel(16);

        let reload = Arc::new(SseReload {
            reload_tx: reload_tx.clone(),
        });
        let scheduler = Arc::new(RefreshScheduler::new(Arc::new(SystemClock), reload));

        Self {
            settings: Arc::new(settings),
            scheduler,
            reload_tx,
        }
    }
}

/// Production reload strategy: broadcast the command to every display
/// connected to the events stream; the page performs the actual reload.
pub struct SseReload {
    reload_tx: broadcast::Sender<ReloadCommand>,
}

#[async_trait]
impl ReloadStrategy for SseReload {
    async fn reload(&self, bypass_cache: bool) -> Result<(), RefreshError> {
        match self.reload_tx.send(ReloadCommand { bypass_cache }) {
            Ok(receivers) => {
                debug!(receivers, bypass_cache, "Reload command broadcast");
            }
            Err(_) => {
                // No receivers just means no display is connected right now
                debug!("No connected displays for reload command");
            }
        }
        Ok(())
    }
}
