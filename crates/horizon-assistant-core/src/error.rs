//! Error types for Horizon Assistant.

use crate::handle::{AssistantId, PageId};

/// Result type alias for assistant operations.
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Errors reported by the flow controller.
///
/// None of these leave the controller in a partially updated state: an
/// operation that fails has not changed anything the embedder can observe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistantError {
    /// The page identity is not registered with this assistant.
    #[error("{0} is not a page of this assistant")]
    InvalidPageIdentity(PageId),

    /// The page identity is already registered with this assistant.
    #[error("{0} has already been added to this assistant")]
    DuplicateIdentity(PageId),

    /// The page is owned by a different assistant.
    #[error("{page} already belongs to {owner}")]
    InvalidParent {
        /// The page being inserted.
        page: PageId,
        /// The assistant that currently owns it.
        owner: AssistantId,
    },

    /// No page exists at the requested position.
    #[error("page index {index} is out of range (assistant has {len} pages)")]
    PageIndexOutOfRange {
        /// The requested index.
        index: i32,
        /// Number of pages at the time of the request.
        len: usize,
    },

    /// The page exists but is not visible, so it cannot become current.
    #[error("{0} is hidden and cannot become the current page")]
    PageHidden(PageId),

    /// The flow function has no page after a non-terminal page.
    #[error(
        "page flow is broken at {page:?}; end the flow with a confirm or summary page"
    )]
    FlowBroken {
        /// The current page when the flow ran out, if any.
        page: Option<PageId>,
    },

    /// There is no page to go back to.
    #[error("there is no previous page to return to")]
    HistoryEmpty,

    /// The intent arrived while an incomplete progress page is current.
    #[error("{0} is not allowed while a progress page is running")]
    ProgressGated(&'static str),

    /// The action behind the intent is currently hidden or insensitive.
    #[error("the {0} action is not available on the current page")]
    ActionUnavailable(&'static str),

    /// A page kind could not be decoded.
    #[error("unknown page kind '{0}'")]
    UnknownPageKind(String),
}

impl AssistantError {
    /// Create an index error.
    pub fn out_of_range(index: i32, len: usize) -> Self {
        Self::PageIndexOutOfRange { index, len }
    }

    /// Whether this error reports a misuse of the API rather than a
    /// user-driven intent that was refused.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidParent { .. } | Self::UnknownPageKind(_) | Self::DuplicateIdentity(_)
        )
    }
}
