//! Timestamped console logging macros.
//!
//! `info!`, `warn!` and `error!` always print to stderr. `event!` traces
//! individual requests and is only active when `RESTCALL_LOG_EVENTS` is set.

/// Environment variable enabling per-request `event!` traces.
pub const LOG_EVENTS_VAR: &str = "RESTCALL_LOG_EVENTS";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        eprintln!("\x1b[32m[INFO] [{}]\x1b[0m [restcall] {}", $crate::chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!("\x1b[35m[WARN] [{}]\x1b[0m [restcall] {}", $crate::chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        eprintln!("\x1b[31m[ERROR][{}]\x1b[0m [restcall] {}", $crate::chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if std::env::var($crate::logger::LOG_EVENTS_VAR).is_ok() {
            eprintln!("\x1b[36m[EVENT][{}]\x1b[0m [restcall] {}", $crate::chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
        }
    };
}
