pub mod controller;
pub mod loop_worker;

pub use controller::PollerController;
pub use loop_worker::POLL_INTERVAL_MS;
