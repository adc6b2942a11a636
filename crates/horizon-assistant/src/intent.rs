//! User intents delivered by the renderer.

use std::fmt;

use crate::actions::Action;

/// A navigation request coming from the user.
///
/// Button activations map one-to-one onto intents; an Escape key press is
/// delivered as [`Intent::Cancel`] and a window-manager close request as
/// [`Intent::Close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Advance to the next page.
    Forward,
    /// Return to the previous page.
    Back,
    /// Accept the collected data.
    Apply,
    /// Skip ahead to the end of the flow.
    Last,
    /// Abandon the flow.
    Cancel,
    /// Dismiss the assistant.
    Close,
}

impl Intent {
    /// The action whose button delivers this intent.
    pub fn action(self) -> Action {
        match self {
            Self::Forward => Action::Forward,
            Self::Back => Action::Back,
            Self::Apply => Action::Apply,
            Self::Last => Action::Last,
            Self::Cancel => Action::Cancel,
            Self::Close => Action::Close,
        }
    }

    /// Whether the intent is refused while a progress page is running.
    ///
    /// Cancel and Close stay available on a finished progress page only.
    pub fn blocked_by_progress(self) -> bool {
        matches!(self, Self::Cancel | Self::Close)
    }

    /// Whether the intent only makes sense when its button is offered.
    pub fn requires_available_action(self) -> bool {
        matches!(self, Self::Forward | Self::Back | Self::Apply | Self::Last)
    }
}

impl From<Action> for Intent {
    fn from(action: Action) -> Self {
        match action {
            Action::Forward => Self::Forward,
            Action::Back => Self::Back,
            Action::Apply => Self::Apply,
            Action::Last => Self::Last,
            Action::Cancel => Self::Cancel,
            Action::Close => Self::Close,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action().name())
    }
}
