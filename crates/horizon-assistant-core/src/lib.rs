//! Core systems for Horizon Assistant.
//!
//! This crate provides the foundation the flow controller is built on:
//!
//! - **Signals**: Typed, synchronous event bus with intercepting variant
//! - **Handles**: Stable page identities and page ownership tracking
//! - **Errors**: The error taxonomy shared by every assistant operation
//! - **Logging**: Tracing targets, span names and logging macros
//!
//! # Signal Example
//!
//! ```
//! use horizon_assistant_core::{InterceptSignal, Propagation, Signal};
//!
//! let applied = Signal::<()>::new();
//! applied.connect(|_| println!("data applied"));
//! applied.emit(());
//!
//! // Intercepting slots may rewrite the value and stop later slots
//! let preparing = InterceptSignal::<u32>::new();
//! preparing.connect(|step| {
//!     *step += 1;
//!     Propagation::Stop
//! });
//! preparing.connect(|_| unreachable!());
//!
//! let mut step = 0;
//! assert!(preparing.emit(&mut step).is_stop());
//! assert_eq!(step, 1);
//! ```

mod error;
pub mod handle;
pub mod logging;
pub mod signal;

pub use error::{AssistantError, Result};
pub use handle::{AssistantId, PageId};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, InterceptSignal, Propagation, Signal};
