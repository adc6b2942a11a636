//! Logging facilities for Horizon Assistant.
//!
//! Horizon Assistant uses the `tracing` crate for instrumentation. The library
//! never installs a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_assistant=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```
//!
//! Diagnostics for refused navigation (a broken page flow, an empty history)
//! are reported at `error` level under [`targets::CONTROLLER`]; intents that
//! are dropped because a progress page is still running are only reported at
//! `debug` level.

/// Span names used throughout Horizon Assistant for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// A page transition (forward, back, jump, relocation).
    pub const TRANSITION: &str = "horizon_assistant::transition";
    /// Delivery of a user intent.
    pub const INTENT: &str = "horizon_assistant::intent";
    /// Recomputation of the action state.
    pub const ACTIONS: &str = "horizon_assistant::actions";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_assistant_core";
    /// Signal system target.
    pub const SIGNAL: &str = "horizon_assistant_core::signal";
    /// Page handle and ownership target.
    pub const HANDLE: &str = "horizon_assistant_core::handle";
    /// Page registry target.
    pub const REGISTRY: &str = "horizon_assistant::registry";
    /// Flow function target.
    pub const FLOW: &str = "horizon_assistant::flow";
    /// History stack target.
    pub const HISTORY: &str = "horizon_assistant::history";
    /// Controller target.
    pub const CONTROLLER: &str = "horizon_assistant::controller";
}

/// A guard that keeps a tracing span entered while alive.
///
/// This is useful for tracking the duration of transitions.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_assistant::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros that pin the
/// controller target.
#[macro_export]
macro_rules! assistant_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_assistant::controller", $($arg)*)
    };
}

#[macro_export]
macro_rules! assistant_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_assistant::controller", $($arg)*)
    };
}

#[macro_export]
macro_rules! assistant_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "horizon_assistant::controller", $($arg)*)
    };
}

#[macro_export]
macro_rules! assistant_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_assistant::controller", $($arg)*)
    };
}

#[macro_export]
macro_rules! assistant_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "horizon_assistant::controller", $($arg)*)
    };
}
