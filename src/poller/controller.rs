use std::sync::Arc;

use anyhow::{Context, Result};
use log::debug;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::display::ResultLog;
use crate::escalation::EscalationController;
use crate::gateway::Gateway;

use super::loop_worker::poll_loop;

/// Starts and stops the polling loop. Start is idempotent; stop cancels the
/// cadence immediately and joins the worker.
pub struct PollerController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl PollerController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(
        &mut self,
        gateway: Arc<dyn Gateway>,
        feed: Arc<dyn ResultLog>,
        escalation: EscalationController,
    ) {
        if self.handle.is_some() {
            debug!("poller already running; start is a no-op");
            return;
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(poll_loop(gateway, feed, escalation, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("poll loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for PollerController {
    fn default() -> Self {
        Self::new()
    }
}
