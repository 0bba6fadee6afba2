use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, warn};
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::display::{PromptScreen, ResultLog};
use crate::gateway::Gateway;
use crate::types::Event;

use super::state::{PromptState, COUNTDOWN_SECS};

const NO_TRANSCRIPT_PLACEHOLDER: &str = "(no transcript)";

/// Owns the single confirmation prompt and its countdown. Every prompt
/// resolves exactly once (human safe, human send, or countdown expiry),
/// and each resolution path produces exactly one result-feed line.
#[derive(Clone)]
pub struct EscalationController {
    state: Arc<Mutex<PromptState>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    gateway: Arc<dyn Gateway>,
    feed: Arc<dyn ResultLog>,
    screen: Arc<dyn PromptScreen>,
}

impl EscalationController {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        feed: Arc<dyn ResultLog>,
        screen: Arc<dyn PromptScreen>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(PromptState::new())),
            ticker: Arc::new(Mutex::new(None)),
            gateway,
            feed,
            screen,
        }
    }

    pub async fn state(&self) -> PromptState {
        self.state.lock().await.clone()
    }

    /// Entry point for event sources. Opens a prompt only for significant
    /// events; insignificant ones are dropped here.
    pub async fn request_prompt(&self, event: Event) {
        if !event.is_significant() {
            return;
        }
        self.open_prompt(event).await;
    }

    /// Open the confirmation prompt for an event whose escalation decision
    /// has already been made (poll path after the significance test, upload
    /// path when the backend set the trigger flag). A prompt that is already
    /// open stays bound to its original event; the newcomer is dropped.
    pub async fn open_prompt(&self, event: Event) {
        {
            let mut state = self.state.lock().await;
            if state.is_active() {
                debug!(
                    "prompt already open; ignoring new event '{}' ({:.3})",
                    event.top_label, event.top_score
                );
                return;
            }
            let transcript = if event.transcript.is_empty() {
                NO_TRANSCRIPT_PLACEHOLDER
            } else {
                event.transcript.as_str()
            };
            self.screen.show_transcript(transcript);
            self.screen.set_countdown(COUNTDOWN_SECS);
            state.open(event);
        }
        self.spawn_ticker().await;
    }

    /// Human pressed "I'm Safe". No-op when no prompt is open.
    pub async fn confirm_safe(&self) {
        let resolved = self.state.lock().await.take_event().is_some();
        if !resolved {
            return;
        }
        self.cancel_ticker().await;
        self.screen.clear();
        if let Err(err) = self.gateway.submit_user_response("safe").await {
            warn!("user_response submission failed: {err:?}");
        }
        self.feed.append("✅ User confirmed safe. No alert sent.");
    }

    /// Human pressed "Send Alert". No-op when no prompt is open, which is
    /// also the guard against a press that lost the race with the timeout.
    pub async fn send_alert(&self) {
        let event = self.state.lock().await.take_event();
        let Some(event) = event else {
            return;
        };
        self.cancel_ticker().await;
        self.screen.clear();
        deliver_alert(
            self.gateway.as_ref(),
            self.feed.as_ref(),
            &event,
            AlertPath::Manual,
        )
        .await;
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let gateway = self.gateway.clone();
        let feed = self.feed.clone();
        let screen = self.screen.clone();

        let handle = tokio::spawn(async move {
            let tick = Duration::from_secs(1);
            let mut ticker = time::interval_at(time::Instant::now() + tick, tick);
            loop {
                ticker.tick().await;

                let expired = {
                    let mut guard = state.lock().await;
                    if !guard.is_active() {
                        break;
                    }
                    let remaining = guard.tick();
                    screen.set_countdown(remaining);
                    if remaining == 0 {
                        guard.take_event()
                    } else {
                        None
                    }
                };

                if let Some(event) = expired {
                    screen.clear();

                    // Detached so a later prompt replacing this ticker
                    // cannot abort an alert that is already owed.
                    let gateway_clone = gateway.clone();
                    let feed_clone = feed.clone();
                    tokio::spawn(async move {
                        deliver_alert(
                            gateway_clone.as_ref(),
                            feed_clone.as_ref(),
                            &event,
                            AlertPath::Timeout,
                        )
                        .await;
                    });
                    break;
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}

#[derive(Clone, Copy)]
enum AlertPath {
    Manual,
    Timeout,
}

async fn deliver_alert(gateway: &dyn Gateway, feed: &dyn ResultLog, event: &Event, path: AlertPath) {
    match gateway.submit_alert(&event.transcript, &event.clip_path).await {
        Ok(result) => {
            let line = match path {
                AlertPath::Manual => format!(
                    "🚨 Alert sent (sms: {}, email: {})",
                    result.sms_sent, result.email_sent
                ),
                AlertPath::Timeout => format!(
                    "⏰ Auto alert sent (sms: {}, email: {})",
                    result.sms_sent, result.email_sent
                ),
            };
            feed.append(&line);
        }
        Err(err) => {
            error!("alert submission failed: {err:?}");
            feed.append(&format!("⚠ Alert failed: {err}"));
        }
    }
}
