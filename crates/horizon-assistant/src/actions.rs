//! Navigation actions and their derived state.
//!
//! The controller never draws buttons. After every state change it derives an
//! [`ActionState`] record describing, for each logical [`Action`], whether it
//! is visible and whether it is sensitive, plus which action is the default
//! and where focus should fall back to. The embedder's renderer draws from
//! that record and delivers intents back into the controller.

use std::fmt;

use horizon_assistant_core::logging::targets;

use crate::flow::{resolve_next, ForwardPageFunc};
use crate::page::{Page, PageKind};
use crate::registry::PageRegistry;

// ============================================================================
// Action
// ============================================================================

/// A logical navigation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Abandon the flow.
    Cancel,
    /// Return to the previous page.
    Back,
    /// Advance to the next page.
    Forward,
    /// Accept the collected data.
    Apply,
    /// Dismiss the finished flow.
    Close,
    /// Skip over complete content pages to the end of the flow.
    Last,
}

impl Action {
    /// All actions, in declaration order.
    pub const ALL: [Action; 6] = [
        Action::Cancel,
        Action::Back,
        Action::Forward,
        Action::Apply,
        Action::Close,
        Action::Last,
    ];

    /// Actions eligible to be the default, highest priority first.
    pub const DEFAULT_PRIORITY: [Action; 3] = [Action::Apply, Action::Close, Action::Forward];

    /// Order in which focus falls back to an action when the page itself
    /// takes no focus.
    pub const FOCUS_ORDER: [Action; 6] = [
        Action::Apply,
        Action::Close,
        Action::Forward,
        Action::Back,
        Action::Cancel,
        Action::Last,
    ];

    /// Lower-case name of the action.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Back => "back",
            Self::Forward => "forward",
            Self::Apply => "apply",
            Self::Close => "close",
            Self::Last => "last",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ActionFlags
// ============================================================================

/// Visibility and sensitivity of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionFlags {
    /// Whether the action is presented at all.
    pub visible: bool,
    /// Whether the action can be activated.
    pub sensitive: bool,
}

impl ActionFlags {
    /// Not presented.
    pub const HIDDEN: Self = Self {
        visible: false,
        sensitive: false,
    };

    /// Presented, with the given sensitivity.
    pub const fn shown(sensitive: bool) -> Self {
        Self {
            visible: true,
            sensitive,
        }
    }

    /// Whether the action is both visible and sensitive.
    pub fn is_available(self) -> bool {
        self.visible && self.sensitive
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

// ============================================================================
// ActionState
// ============================================================================

/// Everything the controller decided about the navigation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionState {
    cancel: ActionFlags,
    back: ActionFlags,
    forward: ActionFlags,
    apply: ActionFlags,
    close: ActionFlags,
    last: ActionFlags,
    default_action: Option<Action>,
    focus_fallback: Option<Action>,
}

/// Inputs the action derivation reads.
pub(crate) struct ActionInputs<'a> {
    pub pages: &'a PageRegistry,
    pub flow: &'a dyn ForwardPageFunc,
    pub current: Option<usize>,
    pub committed: bool,
    pub history_empty: bool,
}

impl ActionState {
    /// The state with every action hidden.
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Flags of one action.
    pub fn flags(&self, action: Action) -> ActionFlags {
        match action {
            Action::Cancel => self.cancel,
            Action::Back => self.back,
            Action::Forward => self.forward,
            Action::Apply => self.apply,
            Action::Close => self.close,
            Action::Last => self.last,
        }
    }

    fn flags_mut(&mut self, action: Action) -> &mut ActionFlags {
        match action {
            Action::Cancel => &mut self.cancel,
            Action::Back => &mut self.back,
            Action::Forward => &mut self.forward,
            Action::Apply => &mut self.apply,
            Action::Close => &mut self.close,
            Action::Last => &mut self.last,
        }
    }

    /// Whether the action is presented.
    pub fn is_visible(&self, action: Action) -> bool {
        self.flags(action).visible
    }

    /// Whether the action can be activated.
    pub fn is_sensitive(&self, action: Action) -> bool {
        self.flags(action).sensitive
    }

    /// Whether the action is visible and sensitive.
    pub fn is_available(&self, action: Action) -> bool {
        self.flags(action).is_available()
    }

    /// The semantically primary action, highlighted and activated on Enter.
    pub fn default_action(&self) -> Option<Action> {
        self.default_action
    }

    /// Whether `action` is the default action.
    pub fn is_default(&self, action: Action) -> bool {
        self.default_action == Some(action)
    }

    /// The action that should take focus when the current page does not.
    pub fn focus_fallback(&self) -> Option<Action> {
        self.focus_fallback
    }

    /// The visible actions, in declaration order.
    pub fn visible_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&a| self.is_visible(a))
            .collect()
    }

    /// Derive the action state for the current page.
    pub(crate) fn derive(inputs: &ActionInputs<'_>) -> Self {
        let Some((index, page)) = inputs
            .current
            .and_then(|i| inputs.pages.page_at(i).map(|p| (i, p)))
        else {
            return Self::hidden();
        };

        let complete = page.is_complete();
        let mut state = Self::hidden();

        match page.kind() {
            PageKind::Intro => {
                state.cancel = ActionFlags::shown(true);
                state.forward = ActionFlags::shown(complete);
                state.last = last_flags(inputs, index, page);
            }
            PageKind::Content => {
                state.cancel = ActionFlags::shown(true);
                state.back = ActionFlags::shown(true);
                state.forward = ActionFlags::shown(complete);
                state.last = last_flags(inputs, index, page);
            }
            PageKind::Confirm => {
                state.cancel = ActionFlags::shown(true);
                state.back = ActionFlags::shown(true);
                state.apply = ActionFlags::shown(complete);
            }
            PageKind::Summary => {
                state.close = ActionFlags::shown(complete);
            }
            PageKind::Progress => {
                state.cancel = ActionFlags::shown(complete);
                state.back = ActionFlags::shown(complete);
                state.forward = ActionFlags {
                    visible: resolve_next(inputs.flow, index, inputs.pages).is_some(),
                    sensitive: complete,
                };
            }
            PageKind::Custom => {}
        }

        if inputs.committed || matches!(page.kind(), PageKind::Summary | PageKind::Custom) {
            state.cancel.hide();
        }
        if inputs.history_empty {
            state.back.hide();
        }

        state.default_action = Action::DEFAULT_PRIORITY
            .into_iter()
            .find(|&a| state.is_visible(a));
        state.focus_fallback = Action::FOCUS_ORDER
            .into_iter()
            .find(|&a| state.is_available(a));

        tracing::trace!(
            target: targets::CONTROLLER,
            kind = %page.kind(),
            default = ?state.default_action,
            focus = ?state.focus_fallback,
            "derived action state"
        );
        state
    }
}

/// Flags for the Last action: sensitive iff the page is complete, visible
/// iff the flow can skip ahead to a terminal page.
fn last_flags(inputs: &ActionInputs<'_>, index: usize, page: &Page) -> ActionFlags {
    let mut flags = ActionFlags::shown(page.is_complete());
    flags.visible = chains_to_terminal(inputs.pages, inputs.flow, index);
    flags
}

/// Whether Last should be offered on the page at `index`.
///
/// Simulates the flow from `index` while the pages are content pages (every
/// page after the first also complete). Last is offered when more than one
/// step was taken and the flow stops on a confirm or summary page. The walk
/// takes at most `pages.len()` steps, so cyclic flows terminate.
pub fn chains_to_terminal(pages: &PageRegistry, flow: &dyn ForwardPageFunc, index: usize) -> bool {
    let n_pages = pages.len();
    let mut position = Some(index);
    let mut count = 0;

    while let Some(i) = position {
        let Some(page) = pages.page_at(i) else {
            break;
        };
        if page.kind() != PageKind::Content || (count > 0 && !page.is_complete()) || count >= n_pages {
            break;
        }
        position = resolve_next(flow, i, pages);
        count += 1;
    }

    count > 1
        && position
            .and_then(|i| pages.page_at(i))
            .is_some_and(|p| p.kind().is_terminal())
}

/// How many buttons the renderer should reserve room for.
///
/// Counts, for every visible page, Cancel plus the primary action, Back on
/// all but the first page, and Last where it may be offered; takes the
/// maximum and adds the renderer's own `extra` buttons.
pub fn required_action_slots(pages: &PageRegistry, flow: &dyn ForwardPageFunc, extra: usize) -> usize {
    let widest = pages
        .iter()
        .enumerate()
        .filter(|(_, page)| page.is_visible())
        .map(|(index, _)| {
            let mut buttons = 2;
            if index > 0 {
                buttons += 1;
            }
            if chains_to_terminal(pages, flow, index) {
                buttons += 1;
            }
            buttons
        })
        .max()
        .unwrap_or(0);
    widest + extra
}
