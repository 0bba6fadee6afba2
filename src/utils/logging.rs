//! Conditional logging macros gated on a module-level `ENABLE_LOGS` const.
//!
//! High-traffic loop modules define `const ENABLE_LOGS: bool = ...;` and use
//! these instead of the bare `log` macros so their chatter can be silenced
//! without touching call sites.

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}
