use std::sync::Arc;

use anyhow::Result;
use log::info;
use tokio::sync::Mutex;

use crate::display::{PromptScreen, ResultLog};
use crate::escalation::EscalationController;
use crate::gateway::Gateway;
use crate::poller::PollerController;
use crate::types::Event;

/// Top-level handle for one monitoring session: toggles the poller around
/// the gateway's start/stop calls and routes uploads into the escalation
/// controller.
#[derive(Clone)]
pub struct SessionController {
    gateway: Arc<dyn Gateway>,
    feed: Arc<dyn ResultLog>,
    escalation: EscalationController,
    poller: Arc<Mutex<PollerController>>,
}

impl SessionController {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        feed: Arc<dyn ResultLog>,
        screen: Arc<dyn PromptScreen>,
    ) -> Self {
        let escalation = EscalationController::new(gateway.clone(), feed.clone(), screen);
        Self {
            gateway,
            feed,
            escalation,
            poller: Arc::new(Mutex::new(PollerController::new())),
        }
    }

    pub fn escalation(&self) -> &EscalationController {
        &self.escalation
    }

    pub async fn is_live(&self) -> bool {
        self.poller.lock().await.is_running()
    }

    /// Start a live session. Returns the gateway's literal status string for
    /// display. A failed gateway call leaves the session state unchanged.
    pub async fn start_live(&self) -> Result<String> {
        let status = self.gateway.start_live_session().await?;
        info!("live session started (backend status: {})", status.status);
        self.poller.lock().await.start(
            self.gateway.clone(),
            self.feed.clone(),
            self.escalation.clone(),
        );
        Ok(status.status)
    }

    /// Stop the live session and halt polling.
    pub async fn stop_live(&self) -> Result<String> {
        let status = self.gateway.stop_live_session().await?;
        info!("live session stopped (backend status: {})", status.status);
        self.poller.lock().await.stop().await?;
        Ok(status.status)
    }

    /// Upload a clip for immediate analysis. When the backend sets the
    /// trigger flag, the analyzed event opens a confirmation prompt through
    /// the same entry point polled events use.
    pub async fn upload_clip(&self, file_name: &str, bytes: Vec<u8>) -> Result<Event> {
        let response = self.gateway.upload_clip(file_name, bytes).await?;
        if response.trigger {
            self.escalation.open_prompt(response.event.clone()).await;
        }
        Ok(response.event)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use tokio::time;

    use super::*;
    use crate::display::MemoryLog;
    use crate::gateway::testing::{FakeGateway, RecordingScreen};
    use crate::types::{Event, PollResponse, UploadResponse};

    fn harness() -> (SessionController, Arc<FakeGateway>, Arc<MemoryLog>) {
        let gateway = Arc::new(FakeGateway::new());
        let feed = Arc::new(MemoryLog::new());
        let session = SessionController::new(
            gateway.clone(),
            feed.clone(),
            Arc::new(RecordingScreen::new()),
        );
        (session, gateway, feed)
    }

    fn threat(transcript: &str) -> Event {
        Event {
            timestamp: "2025-01-01 12:00:00".into(),
            top_label: "threat".into(),
            top_score: 0.9,
            transcript: transcript.into(),
            clip_path: "c1".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn start_returns_backend_status_and_begins_polling() {
        let (session, gateway, _feed) = harness();

        let status = session.start_live().await.unwrap();
        assert_eq!(status, "live");
        assert!(session.is_live().await);

        time::sleep(Duration::from_millis(100)).await;
        assert!(gateway.poll_calls.load(Ordering::SeqCst) >= 1);

        session.stop_live().await.unwrap();
        assert!(!session.is_live().await);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_poll_driven_activity() {
        let (session, gateway, feed) = harness();
        session.start_live().await.unwrap();
        time::sleep(Duration::from_millis(100)).await;

        let status = session.stop_live().await.unwrap();
        assert_eq!(status, "stopped");

        gateway.queue_poll(PollResponse {
            events: vec![threat("too late")],
            latest: serde_json::Value::Null,
        });
        time::sleep(Duration::from_secs(5)).await;
        assert!(feed.lines().is_empty());
        assert!(!session.escalation().state().await.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_start_leaves_session_not_live() {
        let (session, gateway, _feed) = harness();
        gateway.fail_session_calls.store(true, Ordering::SeqCst);

        assert!(session.start_live().await.is_err());
        assert!(!session.is_live().await);
    }

    #[tokio::test(start_paused = true)]
    async fn triggered_upload_opens_prompt() {
        let (session, gateway, _feed) = harness();
        *gateway.upload_response.lock().unwrap() = Some(UploadResponse {
            event: threat("scream"),
            trigger: true,
        });

        let event = session.upload_clip("clip.wav", vec![1, 2, 3]).await.unwrap();
        assert_eq!(event.transcript, "scream");

        let state = session.escalation().state().await;
        assert!(state.is_active());
        assert_eq!(state.event.as_ref().unwrap().transcript, "scream");
    }

    #[tokio::test(start_paused = true)]
    async fn untriggered_upload_opens_nothing() {
        let (session, gateway, _feed) = harness();
        *gateway.upload_response.lock().unwrap() = Some(UploadResponse {
            event: Event {
                top_label: "calm".into(),
                top_score: 0.1,
                ..threat("quiet")
            },
            trigger: false,
        });

        session.upload_clip("clip.wav", vec![1]).await.unwrap();
        assert!(!session.escalation().state().await.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn upload_cannot_open_second_prompt() {
        let (session, gateway, _feed) = harness();
        session.escalation().request_prompt(threat("first")).await;

        *gateway.upload_response.lock().unwrap() = Some(UploadResponse {
            event: threat("second"),
            trigger: true,
        });
        session.upload_clip("clip.wav", vec![1]).await.unwrap();

        let state = session.escalation().state().await;
        assert_eq!(state.event.as_ref().unwrap().transcript, "first");
    }
}
