use serde::Serialize;

use crate::types::Event;

/// Seconds a prompt stays open before auto-escalating.
pub const COUNTDOWN_SECS: u32 = 10;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PromptStatus {
    Idle,
    AwaitingResponse,
}

impl Default for PromptStatus {
    fn default() -> Self {
        PromptStatus::Idle
    }
}

/// Working state of the confirmation prompt. At most one exists; only the
/// escalation controller's own callbacks mutate it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptState {
    pub status: PromptStatus,
    pub event: Option<Event>,
    pub remaining_secs: u32,
}

impl PromptState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.status == PromptStatus::AwaitingResponse
    }

    /// Bind an event and arm the countdown.
    pub fn open(&mut self, event: Event) {
        self.status = PromptStatus::AwaitingResponse;
        self.event = Some(event);
        self.remaining_secs = COUNTDOWN_SECS;
    }

    /// Decrement the countdown by one second; returns the new value.
    pub fn tick(&mut self) -> u32 {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs
    }

    /// Resolve the prompt: take the bound event and return to `Idle`.
    /// Returns `None` when the prompt was already resolved, which is how
    /// stale actions (a tick or a button press that lost the race) no-op.
    pub fn take_event(&mut self) -> Option<Event> {
        let event = self.event.take();
        self.status = PromptStatus::Idle;
        self.remaining_secs = 0;
        event
    }
}
