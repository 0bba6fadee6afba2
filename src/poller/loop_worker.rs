use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::display::ResultLog;
use crate::escalation::EscalationController;
use crate::gateway::Gateway;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Poll cadence while the session is live.
pub const POLL_INTERVAL_MS: u64 = 1200;

/// Repeatedly drains the backend's event queue until cancelled. Each event
/// gets one feed line and, when significant, a confirmation-prompt request.
/// A failed cycle is skipped without surfacing anything to the feed.
pub async fn poll_loop(
    gateway: Arc<dyn Gateway>,
    feed: Arc<dyn ResultLog>,
    escalation: EscalationController,
    cancel_token: CancellationToken,
) {
    let mut ticker = time::interval(Duration::from_millis(POLL_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let response = match gateway.poll_events().await {
                    Ok(response) => response,
                    Err(err) => {
                        log_warn!("poll cycle failed, skipping: {err:?}");
                        continue;
                    }
                };

                // The session may have stopped while the request was in
                // flight; its result must not be processed.
                if cancel_token.is_cancelled() {
                    break;
                }

                if response.events.is_empty() {
                    // A latest-only payload produces no observable action.
                    continue;
                }

                // Delivery order, no reordering or dedup.
                for event in response.events {
                    feed.append(&event.feed_line());
                    escalation.request_prompt(event).await;
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("poll loop shutting down");
                break;
            }
        }
    }
}
