//! Horizon Assistant - a multi-step assistant (wizard) flow controller.
//!
//! The controller coordinates an ordered list of pages of distinct
//! [`PageKind`]s, decides which navigation actions are currently offered,
//! delegates the "which page comes next" decision to a pluggable
//! [forward page function](flow::ForwardPageFunc), and keeps a history for
//! back navigation.
//!
//! It draws nothing. A renderer reads the derived [`ActionState`] and the
//! page list, and delivers the user's button presses back as [`Intent`]s.
//!
//! # Example
//!
//! ```
//! use horizon_assistant::{Action, Assistant, Intent, Page, PageKind};
//! use horizon_assistant_core::PageId;
//!
//! let mut assistant = Assistant::new();
//! let welcome = PageId::new();
//! let options = PageId::new();
//! let confirm = PageId::new();
//!
//! assistant.append_page(Page::new(welcome).with_kind(PageKind::Intro).with_complete(true)).unwrap();
//! assistant.append_page(Page::new(options)).unwrap();
//! assistant.append_page(Page::new(confirm).with_kind(PageKind::Confirm).with_complete(true)).unwrap();
//! assistant.map();
//!
//! assistant.deliver(Intent::Forward).unwrap();
//! assert_eq!(assistant.current_page(), Some(options));
//!
//! // The options page is not complete yet, so Forward is offered but disabled
//! let state = assistant.action_state();
//! assert!(state.is_visible(Action::Forward));
//! assert!(!state.is_sensitive(Action::Forward));
//!
//! assistant.set_page_complete(options, true).unwrap();
//! assistant.deliver(Intent::Forward).unwrap();
//! assert_eq!(assistant.current_page(), Some(confirm));
//! ```

pub mod actions;
mod assistant;
pub mod config;
pub mod debug;
pub mod flow;
pub mod history;
pub mod intent;
pub mod page;
pub mod registry;
pub mod titles;
pub mod transition;

pub use actions::{Action, ActionFlags, ActionState};
pub use assistant::Assistant;
pub use config::AssistantConfig;
pub use flow::{ContextFlow, DefaultFlow, ForwardPageFunc, RawFlow};
pub use history::HistoryStack;
pub use intent::Intent;
pub use page::{Page, PageAttribute, PageKind};
pub use registry::PageRegistry;
pub use titles::{TitleEntry, TitleState};
pub use transition::{PageEdit, Redirect, Transition};
