pub mod controller;
pub mod state;

pub use controller::EscalationController;
pub use state::{PromptState, PromptStatus, COUNTDOWN_SECS};
