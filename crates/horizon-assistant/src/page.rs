//! Pages and page kinds.
//!
//! A [`Page`] is the controller's metadata about one step of the flow. The
//! page body itself belongs to the embedder; the controller only knows the
//! page's identity, its [`PageKind`], and the few flags that influence
//! navigation.

use std::fmt;
use std::str::FromStr;

use horizon_assistant_core::{AssistantError, PageId};

// ============================================================================
// PageKind
// ============================================================================

/// The role a page plays in the flow.
///
/// The kind decides which navigation actions the page offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageKind {
    /// First page of the flow; offers Next and Cancel.
    Intro,
    /// Regular body page; offers Back, Next and Cancel.
    #[default]
    Content,
    /// Decision point; offers Back, Apply and Cancel.
    Confirm,
    /// Terminal acknowledgement; offers Close only.
    Summary,
    /// Long-running work; navigation and cancel wait for completion.
    Progress,
    /// The embedder controls the actions; no buttons are presented.
    Custom,
}

impl PageKind {
    /// All kinds, in declaration order.
    pub const ALL: [PageKind; 6] = [
        PageKind::Intro,
        PageKind::Content,
        PageKind::Confirm,
        PageKind::Summary,
        PageKind::Progress,
        PageKind::Custom,
    ];

    /// Decode the numeric representation used by embedders that persist or
    /// marshal page kinds.
    pub fn from_raw(raw: i32) -> Result<Self, AssistantError> {
        match raw {
            0 => Ok(Self::Content),
            1 => Ok(Self::Intro),
            2 => Ok(Self::Confirm),
            3 => Ok(Self::Summary),
            4 => Ok(Self::Progress),
            5 => Ok(Self::Custom),
            other => Err(AssistantError::UnknownPageKind(other.to_string())),
        }
    }

    /// The numeric representation of this kind.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Content => 0,
            Self::Intro => 1,
            Self::Confirm => 2,
            Self::Summary => 3,
            Self::Progress => 4,
            Self::Custom => 5,
        }
    }

    /// Lower-case name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Content => "content",
            Self::Confirm => "confirm",
            Self::Summary => "summary",
            Self::Progress => "progress",
            Self::Custom => "custom",
        }
    }

    /// Whether the flow is expected to end on a page of this kind.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirm | Self::Summary)
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PageKind {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AssistantError::UnknownPageKind(s.to_string()))
    }
}

// ============================================================================
// PageAttribute
// ============================================================================

/// Identifies which attribute of a page changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageAttribute {
    /// The page kind.
    Kind,
    /// The page title.
    Title,
    /// The completion flag.
    Complete,
    /// The visibility flag.
    Visible,
    /// The padding hint.
    HasPadding,
}

impl PageAttribute {
    /// Whether a change of this attribute can change navigation.
    pub fn affects_navigation(self) -> bool {
        !matches!(self, Self::HasPadding)
    }
}

// ============================================================================
// Page
// ============================================================================

/// Controller-side metadata for one page of the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    id: PageId,
    kind: PageKind,
    title: Option<String>,
    complete: bool,
    complete_explicitly_set: bool,
    visible: bool,
    has_padding: bool,
}

impl Page {
    /// Create a new content page with default flags.
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            kind: PageKind::Content,
            title: None,
            complete: false,
            complete_explicitly_set: false,
            visible: true,
            has_padding: true,
        }
    }

    /// Set the kind using builder pattern.
    pub fn with_kind(mut self, kind: PageKind) -> Self {
        self.set_kind(kind);
        self
    }

    /// Set the title using builder pattern.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the completion flag using builder pattern.
    pub fn with_complete(mut self, complete: bool) -> Self {
        self.set_complete(complete);
        self
    }

    /// Set the visibility using builder pattern.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the padding hint using builder pattern.
    pub fn with_padding(mut self, has_padding: bool) -> Self {
        self.has_padding = has_padding;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The page identity.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// The page kind.
    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// The page title, if one is set.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Whether the page has a non-empty title.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Whether the page is complete.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether `complete` has ever been set explicitly.
    pub fn is_complete_explicitly_set(&self) -> bool {
        self.complete_explicitly_set
    }

    /// Whether the page is visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The padding hint for the renderer.
    pub fn has_padding(&self) -> bool {
        self.has_padding
    }

    /// Whether this is a progress page that has not finished yet.
    pub fn is_running_progress(&self) -> bool {
        self.kind == PageKind::Progress && !self.complete
    }

    // =========================================================================
    // Mutators (used by the registry)
    // =========================================================================

    /// Change the kind. Returns `true` if the kind changed.
    ///
    /// A page turned into a summary page is marked complete unless the
    /// completion flag has been set explicitly before.
    pub(crate) fn set_kind(&mut self, kind: PageKind) -> bool {
        if self.kind == kind {
            return false;
        }
        self.kind = kind;
        if kind == PageKind::Summary && !self.complete_explicitly_set {
            self.complete = true;
        }
        true
    }

    /// Change the title. Returns `true` if the title changed.
    pub(crate) fn set_title(&mut self, title: Option<String>) -> bool {
        if self.title == title {
            return false;
        }
        self.title = title;
        true
    }

    /// Change the completion flag. Returns `true` if it changed.
    pub(crate) fn set_complete(&mut self, complete: bool) -> bool {
        if self.complete == complete {
            return false;
        }
        self.complete = complete;
        self.complete_explicitly_set = true;
        true
    }

    /// Change the visibility. Returns `true` if it changed.
    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        true
    }

    /// Change the padding hint. Returns `true` if it changed.
    pub(crate) fn set_has_padding(&mut self, has_padding: bool) -> bool {
        if self.has_padding == has_padding {
            return false;
        }
        self.has_padding = has_padding;
        true
    }
}
