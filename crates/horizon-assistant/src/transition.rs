//! The payload of the `prepare` signal.
//!
//! Handlers of [`Assistant::prepare`] receive a `&mut Transition`. They cannot
//! reach the assistant itself while it is emitting, so instead of calling
//! back into it they record what they want on the transition: page edits that
//! are applied once every handler has run, and optionally a redirect to a
//! different page.
//!
//! [`Assistant::prepare`]: crate::Assistant::prepare

use horizon_assistant_core::PageId;

/// Where a handler asked the assistant to go instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// A page position; negative means the last page.
    Index(i32),
    /// A page identity.
    Page(PageId),
}

/// A page change queued by a `prepare` handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEdit {
    /// Set the completion flag.
    Complete(PageId, bool),
    /// Set or clear the title.
    Title(PageId, Option<String>),
    /// Show or hide the page.
    Visible(PageId, bool),
}

impl PageEdit {
    /// The page the edit applies to.
    pub fn page(&self) -> PageId {
        match self {
            Self::Complete(id, _) | Self::Title(id, _) | Self::Visible(id, _) => *id,
        }
    }
}

/// A page becoming current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    page: PageId,
    index: usize,
    previous: Option<PageId>,
    pages: Vec<PageId>,
    redirect: Option<Redirect>,
    edits: Vec<PageEdit>,
}

impl Transition {
    pub(crate) fn new(page: PageId, index: usize, previous: Option<PageId>, pages: Vec<PageId>) -> Self {
        Self {
            page,
            index,
            previous,
            pages,
            redirect: None,
            edits: Vec::new(),
        }
    }

    /// The page about to be shown.
    pub fn page(&self) -> PageId {
        self.page
    }

    /// Index of the page about to be shown.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The page that was current before, if any.
    pub fn previous(&self) -> Option<PageId> {
        self.previous
    }

    /// The page order at the time of the transition.
    pub fn pages(&self) -> &[PageId] {
        &self.pages
    }

    /// Number of pages at the time of the transition.
    pub fn n_pages(&self) -> usize {
        self.pages.len()
    }

    /// Ask the assistant to show the page at `index` instead.
    ///
    /// A negative index means the last page. The last redirect requested wins.
    pub fn redirect_to_index(&mut self, index: i32) {
        self.redirect = Some(Redirect::Index(index));
    }

    /// Ask the assistant to show `page` instead.
    pub fn redirect_to(&mut self, page: PageId) {
        self.redirect = Some(Redirect::Page(page));
    }

    /// The redirect requested so far.
    pub fn redirect(&self) -> Option<Redirect> {
        self.redirect
    }

    /// Queue a change of the completion flag of `page`.
    pub fn set_page_complete(&mut self, page: PageId, complete: bool) {
        self.edits.push(PageEdit::Complete(page, complete));
    }

    /// Queue a title change of `page`.
    pub fn set_page_title(&mut self, page: PageId, title: Option<String>) {
        self.edits.push(PageEdit::Title(page, title));
    }

    /// Queue a visibility change of `page`.
    pub fn set_page_visible(&mut self, page: PageId, visible: bool) {
        self.edits.push(PageEdit::Visible(page, visible));
    }

    /// Edits queued so far, in order.
    pub fn edits(&self) -> &[PageEdit] {
        &self.edits
    }

    pub(crate) fn into_parts(self) -> (Vec<PageEdit>, Option<Redirect>) {
        (self.edits, self.redirect)
    }
}
