#![deny(missing_docs)]
//! Shared logging utilities for the lookup workspace.
//!
//! This crate provides the `lookup_*` logging macros used across the codebase,
//! a thread-local session tag carried on every line, and a test initializer
//! for the global logger.

use std::cell::Cell;

thread_local! {
    /// Thread-local storage for the current explanation session number.
    static SESSION: Cell<u64> = const { Cell::new(0) };
}

/// Sets the session number for the current thread.
/// Called by the orchestrator at the start of each trigger cycle.
pub fn set_session(session: u64) {
    SESSION.with(|v| v.set(session));
}

/// Retrieves the session number for the current thread.
/// Returns 0 if no cycle has run on this thread yet.
pub fn get_session() -> u64 {
    SESSION.with(|v| v.get())
}

/// Logs a trace-level message tagged with the current session.
#[macro_export]
macro_rules! lookup_trace {
    ($($arg:tt)*) => {{
        log::trace!("[session {}] {}", $crate::get_session(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current session.
#[macro_export]
macro_rules! lookup_info {
    ($($arg:tt)*) => {{
        log::info!("[session {}] {}", $crate::get_session(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current session.
#[macro_export]
macro_rules! lookup_debug {
    ($($arg:tt)*) => {{
        log::debug!("[session {}] {}", $crate::get_session(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current session.
#[macro_export]
macro_rules! lookup_warn {
    ($($arg:tt)*) => {{
        log::warn!("[session {}] {}", $crate::get_session(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current session.
#[macro_export]
macro_rules! lookup_error {
    ($($arg:tt)*) => {{
        log::error!("[session {}] {}", $crate::get_session(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
