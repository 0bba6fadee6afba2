//! Controller for a live safety-monitoring session.
//!
//! Polls a backend for detected audio/video events, decides which are
//! significant enough to require human confirmation, and runs the time-boxed
//! escalation workflow: show a confirmation prompt, auto-escalate to an alert
//! when the human does not respond before the countdown expires.
//!
//! The backend, the transport, and all rendering are external collaborators
//! behind the [`gateway::Gateway`], [`display::ResultLog`], and
//! [`display::PromptScreen`] seams. No state survives the session.

pub mod display;
pub mod escalation;
pub mod gateway;
pub mod poller;
pub mod session;
pub mod types;
mod utils;

pub use escalation::{EscalationController, PromptState, PromptStatus, COUNTDOWN_SECS};
pub use gateway::{Gateway, HttpGateway};
pub use poller::{PollerController, POLL_INTERVAL_MS};
pub use session::SessionController;
pub use types::{AlertResult, Event, PollResponse, SessionStatus, UploadResponse};
