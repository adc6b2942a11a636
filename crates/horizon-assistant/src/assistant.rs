//! The assistant flow controller.
//!
//! [`Assistant`] ties the page registry, the forward page function, and the
//! back-navigation history together. The embedder feeds it page mutations and
//! user [`Intent`]s; the assistant decides which page is current, which
//! navigation actions are offered, and tells listeners about it through its
//! signals.
//!
//! # Example
//!
//! ```
//! use horizon_assistant::{Assistant, Intent, Page, PageKind};
//! use horizon_assistant_core::PageId;
//!
//! let mut assistant = Assistant::new();
//! let intro = PageId::new();
//! let confirm = PageId::new();
//! let summary = PageId::new();
//!
//! assistant.append_page(Page::new(intro).with_kind(PageKind::Intro).with_complete(true)).unwrap();
//! assistant.append_page(Page::new(confirm).with_kind(PageKind::Confirm).with_complete(true)).unwrap();
//! assistant.append_page(Page::new(summary).with_kind(PageKind::Summary)).unwrap();
//!
//! assistant.apply.connect(|_| println!("applying"));
//!
//! assistant.map();
//! assert_eq!(assistant.current_page(), Some(intro));
//!
//! assistant.deliver(Intent::Forward).unwrap();
//! assistant.deliver(Intent::Apply).unwrap();
//! assert_eq!(assistant.current_page(), Some(summary));
//! ```

use std::fmt;

use horizon_assistant_core::logging::span_names;
use horizon_assistant_core::{
    assistant_debug, assistant_error, assistant_trace, assistant_warn, handle,
};
use horizon_assistant_core::{
    AssistantError, AssistantId, InterceptSignal, PageId, PerfSpan, Result, Signal,
};

use crate::actions::{self, ActionInputs, ActionState};
use crate::config::AssistantConfig;
use crate::flow::{resolve_next, DefaultFlow, ForwardPageFunc};
use crate::history::HistoryStack;
use crate::intent::Intent;
use crate::page::{Page, PageAttribute, PageKind};
use crate::registry::PageRegistry;
use crate::titles::TitleState;
use crate::transition::{PageEdit, Redirect, Transition};

/// How deep `prepare` listeners may chain redirects before further
/// redirects are ignored.
const MAX_REDIRECT_DEPTH: usize = 64;

/// A multi-step assistant (wizard) flow controller.
///
/// The assistant is a plain state machine: it owns no UI. Renderers read
/// [`action_state`](Self::action_state) and [`title_state`](Self::title_state)
/// to draw, and deliver the user's button presses through
/// [`deliver`](Self::deliver).
///
/// # Signals
///
/// - `prepare`: a page is about to become current. Listeners receive a
///   [`Transition`] they may redirect or attach page edits to.
/// - `apply`: the user accepted a confirm page.
/// - `close`: the flow finished or the user dismissed it.
/// - `cancel`: the user abandoned the flow.
/// - `page_changed`: an attribute of a page changed.
/// - `current_page_changed`: a transition settled.
/// - `actions_changed`: the derived action state changed.
pub struct Assistant {
    id: AssistantId,
    config: AssistantConfig,
    pages: PageRegistry,
    history: HistoryStack,
    flow: Box<dyn ForwardPageFunc>,
    current: Option<PageId>,
    committed: bool,
    mapped: bool,
    redirect_depth: usize,
    transitions: u64,
    actions: ActionState,
    titles: TitleState,

    /// Emitted before a page becomes current.
    pub prepare: InterceptSignal<Transition>,
    /// Emitted when the user applies a confirm page.
    pub apply: Signal<()>,
    /// Emitted when the flow is closed.
    pub close: Signal<()>,
    /// Emitted when the user cancels.
    pub cancel: Signal<()>,
    /// Emitted after a page attribute changed.
    pub page_changed: Signal<(PageId, PageAttribute)>,
    /// Emitted when the current page changed and the transition settled.
    pub current_page_changed: Signal<Option<PageId>>,
    /// Emitted when the derived action state changed.
    pub actions_changed: Signal<ActionState>,
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new()
    }
}

impl Assistant {
    /// Create an assistant with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AssistantConfig::default())
    }

    /// Create an assistant with the given configuration.
    pub fn with_config(config: AssistantConfig) -> Self {
        let id = AssistantId::new();
        assistant_trace!(assistant = %id, "creating assistant");
        Self {
            id,
            config,
            pages: PageRegistry::new(),
            history: HistoryStack::new(),
            flow: Box::new(DefaultFlow),
            current: None,
            committed: false,
            mapped: false,
            redirect_depth: 0,
            transitions: 0,
            actions: ActionState::hidden(),
            titles: TitleState::default(),
            prepare: InterceptSignal::new(),
            apply: Signal::new(),
            close: Signal::new(),
            cancel: Signal::new(),
            page_changed: Signal::new(),
            current_page_changed: Signal::new(),
            actions_changed: Signal::new(),
        }
    }

    /// The identity of this assistant.
    pub fn id(&self) -> AssistantId {
        self.id
    }

    /// The configuration.
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Create a page with a fresh identity and the configured defaults.
    ///
    /// The page still has to be inserted.
    pub fn create_page(&self) -> Page {
        Page::new(PageId::new()).with_padding(self.config.default_has_padding)
    }

    // =========================================================================
    // Page management
    // =========================================================================

    /// Insert `page` at `position`; a negative position appends.
    ///
    /// Returns the index the page landed at.
    pub fn insert_page(&mut self, page: Page, position: i32) -> Result<usize> {
        let id = page.id();
        if let Err(owner) = handle::claim(id, self.id) {
            assistant_error!(page = %id, %owner, assistant = %self.id, "page belongs to another assistant");
            return Err(AssistantError::InvalidParent { page: id, owner });
        }

        let index = self.pages.insert(page, position)?;
        assistant_debug!(page = %id, index, "page inserted");
        self.refresh();
        Ok(index)
    }

    /// Insert `page` in front of all other pages.
    pub fn prepend_page(&mut self, page: Page) -> Result<usize> {
        self.insert_page(page, 0)
    }

    /// Insert `page` after all other pages.
    pub fn append_page(&mut self, page: Page) -> Result<usize> {
        self.insert_page(page, -1)
    }

    /// Remove a page and return its metadata.
    ///
    /// Removing the current page first tries to advance through the flow; if
    /// that fails, the first remaining visible page becomes current.
    pub fn remove_page(&mut self, id: PageId) -> Result<Page> {
        if !self.pages.contains(id) {
            assistant_warn!(page = %id, "cannot remove unknown page");
            return Err(AssistantError::InvalidPageIdentity(id));
        }

        if self.current == Some(id) {
            let _span = PerfSpan::new(span_names::TRANSITION);
            self.advance();
        }

        let Some((index, page)) = self.pages.remove(id) else {
            return Err(AssistantError::InvalidPageIdentity(id));
        };
        let purged = self.history.purge(id);
        handle::release(id, self.id);
        assistant_debug!(page = %id, index, purged, "page removed");

        if self.current == Some(id) {
            self.relocate_to_first_visible();
        }

        self.refresh();
        Ok(page)
    }

    /// Number of pages.
    pub fn get_n_pages(&self) -> usize {
        self.pages.len()
    }

    /// The page at `index`; `-1` names the last page.
    pub fn get_nth_page(&self, index: i32) -> Option<PageId> {
        match index {
            -1 => self.pages.len().checked_sub(1).and_then(|i| self.pages.get_by_index(i)),
            i if i < 0 => None,
            i => self.pages.get_by_index(i as usize),
        }
    }

    /// Index of the current page.
    pub fn get_current_page_index(&self) -> Option<usize> {
        self.current.and_then(|id| self.pages.index_of(id))
    }

    /// The current page.
    pub fn current_page(&self) -> Option<PageId> {
        self.current
    }

    /// Index of a page.
    pub fn page_index(&self, id: PageId) -> Option<usize> {
        self.pages.index_of(id)
    }

    /// Metadata of a page.
    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id)
    }

    /// The page list.
    pub fn pages(&self) -> &PageRegistry {
        &self.pages
    }

    // =========================================================================
    // Page attributes
    // =========================================================================

    fn require(&self, id: PageId) -> Result<&Page> {
        self.pages.get(id).ok_or_else(|| {
            assistant_warn!(page = %id, "unknown page identity");
            AssistantError::InvalidPageIdentity(id)
        })
    }

    /// The kind of a page.
    pub fn page_kind(&self, id: PageId) -> Result<PageKind> {
        self.require(id).map(Page::kind)
    }

    /// Set the kind of a page.
    pub fn set_page_kind(&mut self, id: PageId, kind: PageKind) -> Result<()> {
        let changed = self.pages.set_kind(id, kind)?;
        if !changed.is_empty() {
            self.refresh();
            for attribute in changed {
                self.page_changed.emit((id, attribute));
            }
        }
        Ok(())
    }

    /// The title of a page.
    pub fn page_title(&self, id: PageId) -> Result<Option<&str>> {
        self.require(id).map(Page::title)
    }

    /// Set or clear the title of a page.
    pub fn set_page_title(&mut self, id: PageId, title: Option<String>) -> Result<()> {
        if self.pages.set_title(id, title)? {
            self.refresh();
            self.page_changed.emit((id, PageAttribute::Title));
        }
        Ok(())
    }

    /// Whether a page is complete.
    pub fn page_complete(&self, id: PageId) -> Result<bool> {
        self.require(id).map(Page::is_complete)
    }

    /// Mark a page complete or incomplete.
    pub fn set_page_complete(&mut self, id: PageId, complete: bool) -> Result<()> {
        if self.pages.set_complete(id, complete)? {
            self.refresh();
            self.page_changed.emit((id, PageAttribute::Complete));
        }
        Ok(())
    }

    /// Whether a page is visible.
    pub fn page_visible(&self, id: PageId) -> Result<bool> {
        self.require(id).map(Page::is_visible)
    }

    /// Show or hide a page.
    ///
    /// Hiding the current page of a mapped assistant moves to another page
    /// the same way removing it would.
    pub fn set_page_visible(&mut self, id: PageId, visible: bool) -> Result<()> {
        if !self.pages.set_visible(id, visible)? {
            return Ok(());
        }

        if !visible && self.mapped && self.current == Some(id) {
            assistant_debug!(page = %id, "current page hidden, moving on");
            let _span = PerfSpan::new(span_names::TRANSITION);
            if !self.advance() && self.current == Some(id) {
                self.relocate_to_first_visible();
            }
        }

        self.refresh();
        self.page_changed.emit((id, PageAttribute::Visible));
        Ok(())
    }

    /// The padding hint of a page.
    pub fn page_has_padding(&self, id: PageId) -> Result<bool> {
        self.require(id).map(Page::has_padding)
    }

    /// Set the padding hint of a page.
    pub fn set_page_has_padding(&mut self, id: PageId, has_padding: bool) -> Result<()> {
        if self.pages.set_has_padding(id, has_padding)? {
            self.page_changed.emit((id, PageAttribute::HasPadding));
        }
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Make the page at `index` current; a negative index names the last page.
    ///
    /// While mapped, the page being left is pushed onto the history. Selecting
    /// the current page again does nothing.
    pub fn set_current_page(&mut self, index: i32) -> Result<()> {
        let len = self.pages.len();
        let target = if index < 0 {
            len.checked_sub(1)
        } else {
            Some(index as usize).filter(|&i| i < len)
        };
        let Some(target) = target else {
            assistant_warn!(index, len, "no page at index");
            return Err(AssistantError::out_of_range(index, len));
        };
        let Some(page) = self.pages.page_at(target) else {
            return Err(AssistantError::out_of_range(index, len));
        };
        if !page.is_visible() {
            assistant_warn!(page = %page.id(), "cannot show a hidden page");
            return Err(AssistantError::PageHidden(page.id()));
        }
        if self.current == Some(page.id()) {
            return Ok(());
        }

        let _span = PerfSpan::new(span_names::TRANSITION);
        if self.mapped {
            if let Some(current) = self.current {
                self.history.push(current);
            }
        }
        self.transition_to(target);
        Ok(())
    }

    /// Make the page `id` current.
    pub fn set_current_page_to(&mut self, id: PageId) -> Result<()> {
        let Some(index) = self.pages.index_of(id) else {
            assistant_warn!(page = %id, "unknown page identity");
            return Err(AssistantError::InvalidPageIdentity(id));
        };
        self.set_current_page(index as i32)
    }

    /// Advance to the page the flow function picks.
    ///
    /// Fails with [`AssistantError::FlowBroken`] when the flow has no next
    /// page and the current page is not a confirm or summary page. On those
    /// terminal pages running out of pages is not an error and nothing
    /// happens.
    pub fn next_page(&mut self) -> Result<()> {
        let _span = PerfSpan::new(span_names::TRANSITION);
        if self.advance() {
            return Ok(());
        }

        let terminal = self
            .current
            .and_then(|id| self.pages.get(id))
            .is_some_and(|page| page.kind().is_terminal());
        if terminal {
            assistant_debug!(page = ?self.current, "flow ended on a terminal page");
            Ok(())
        } else {
            assistant_error!(
                page = ?self.current,
                "page flow is broken; end it with a confirm or summary page"
            );
            Err(AssistantError::FlowBroken { page: self.current })
        }
    }

    /// Return to the most recent page in the history.
    ///
    /// Progress pages and pages that were hidden or removed are skipped.
    pub fn previous_page(&mut self) -> Result<()> {
        let _span = PerfSpan::new(span_names::TRANSITION);
        let target = self
            .history
            .pop_visible_non_progress(&self.pages)
            .and_then(|id| self.pages.index_of(id));
        match target {
            Some(index) => {
                self.transition_to(index);
                Ok(())
            }
            None => {
                assistant_error!("no previous page to return to");
                // Skipped entries may have emptied the history
                self.refresh();
                Err(AssistantError::HistoryEmpty)
            }
        }
    }

    /// Accept the collected data.
    ///
    /// Clears the history; Cancel is no longer offered afterwards. Committing
    /// twice does nothing.
    pub fn commit(&mut self) {
        if self.committed {
            return;
        }
        assistant_debug!(assistant = %self.id, "committed");
        self.history.clear();
        self.committed = true;
        self.refresh();
    }

    /// Recompute the action state.
    ///
    /// Use this when data the flow function depends on changed outside the
    /// assistant. Does nothing visible while unmapped.
    pub fn update_actions(&mut self) {
        self.refresh();
    }

    /// Replace the forward page function.
    ///
    /// The previous function is dropped, which runs its teardown.
    pub fn set_forward_page_func<F>(&mut self, func: F)
    where
        F: ForwardPageFunc + 'static,
    {
        self.flow = Box::new(func);
        self.refresh();
    }

    /// Restore the default forward page function.
    pub fn clear_forward_page_func(&mut self) {
        self.flow = Box::new(DefaultFlow);
        self.refresh();
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// The assistant is being shown.
    ///
    /// Without a current page, the first visible page becomes current.
    pub fn map(&mut self) {
        if self.mapped {
            return;
        }
        assistant_debug!(assistant = %self.id, "mapped");
        self.mapped = true;

        let showable = self
            .current
            .and_then(|id| self.pages.get(id))
            .is_some_and(Page::is_visible);
        if !showable {
            self.current = None;
            if let Some(index) = self.pages.first_visible_from(0) {
                let _span = PerfSpan::new(span_names::TRANSITION);
                self.transition_to(index);
            }
        }
        self.refresh();
    }

    /// The assistant is being hidden.
    ///
    /// Forgets the history and the current page; the pages stay.
    pub fn unmap(&mut self) {
        if !self.mapped {
            return;
        }
        assistant_debug!(assistant = %self.id, "unmapped");
        self.mapped = false;
        self.history.clear();
        let had_current = self.current.take().is_some();

        self.refresh();
        if had_current {
            self.current_page_changed.emit(None);
        }
    }

    /// Release everything the assistant holds.
    ///
    /// Pages are removed and released to other assistants, the forward page
    /// function is torn down, and all listeners are disconnected. Runs
    /// automatically on drop.
    pub fn dispose(&mut self) {
        let released = handle::release_all(self.id);
        assistant_trace!(assistant = %self.id, released, "disposing");

        self.pages = PageRegistry::new();
        self.history.clear();
        self.current = None;
        self.mapped = false;
        self.actions = ActionState::hidden();
        self.titles = TitleState::default();
        self.flow = Box::new(DefaultFlow);

        self.prepare.disconnect_all();
        self.apply.disconnect_all();
        self.close.disconnect_all();
        self.cancel.disconnect_all();
        self.page_changed.disconnect_all();
        self.current_page_changed.disconnect_all();
        self.actions_changed.disconnect_all();
    }

    /// Whether the assistant is shown.
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Whether the collected data has been committed.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Handle a user intent.
    ///
    /// Cancel and Close are refused while a progress page is running. With
    /// [`AssistantConfig::enforce_action_state`], Forward, Back, Apply and
    /// Last are refused unless their action is visible and sensitive.
    pub fn deliver(&mut self, intent: Intent) -> Result<()> {
        let _span = PerfSpan::new(span_names::INTENT);
        let name = intent.action().name();

        let running_progress = self
            .current
            .and_then(|id| self.pages.get(id))
            .is_some_and(Page::is_running_progress);
        if intent.blocked_by_progress() && running_progress {
            assistant_debug!(%intent, "dropped while progress page is running");
            return Err(AssistantError::ProgressGated(name));
        }

        if intent.blocked_by_progress() && self.current.is_none() {
            assistant_debug!(%intent, "dropped without a current page");
            return Err(AssistantError::ActionUnavailable(name));
        }

        if self.config.enforce_action_state
            && intent.requires_available_action()
            && !self.actions.is_available(intent.action())
        {
            assistant_debug!(%intent, "action not available");
            return Err(AssistantError::ActionUnavailable(name));
        }

        assistant_trace!(%intent, "delivering intent");
        match intent {
            Intent::Forward => self.next_page(),
            Intent::Back => self.previous_page(),
            Intent::Apply => {
                self.apply.emit(());
                if !self.advance() {
                    self.close.emit(());
                }
                Ok(())
            }
            Intent::Last => {
                self.skip_to_last();
                Ok(())
            }
            Intent::Cancel => {
                self.cancel.emit(());
                Ok(())
            }
            Intent::Close => {
                self.close.emit(());
                Ok(())
            }
        }
    }

    fn skip_to_last(&mut self) {
        for _ in 0..=self.pages.len() {
            let skippable = self
                .current
                .and_then(|id| self.pages.get(id))
                .is_some_and(|page| page.kind() == PageKind::Content && page.is_complete());
            if !skippable || !self.advance() {
                break;
            }
        }
    }

    // =========================================================================
    // Derived state
    // =========================================================================

    /// The current action state.
    ///
    /// All actions are hidden while the assistant is not mapped.
    pub fn action_state(&self) -> ActionState {
        self.actions
    }

    /// Which page titles a title strip should show.
    pub fn title_state(&self) -> &TitleState {
        &self.titles
    }

    /// Title for the window: the current page's title, or the configured
    /// fallback.
    pub fn window_title(&self) -> Option<&str> {
        self.current
            .and_then(|id| self.pages.get(id))
            .filter(|page| page.has_title())
            .and_then(Page::title)
            .or(self.config.title.as_deref())
    }

    /// Number of buttons a renderer should reserve room for, including
    /// `extra` buttons of its own.
    pub fn required_action_slots(&self, extra: usize) -> usize {
        actions::required_action_slots(&self.pages, self.flow.as_ref(), extra)
    }

    /// The back-navigation history.
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Push the current page and move to the page the flow picks.
    fn advance(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let Some(index) = self.pages.index_of(current) else {
            return false;
        };
        let Some(next) = resolve_next(self.flow.as_ref(), index, &self.pages) else {
            return false;
        };
        if !self.pages.page_at(next).is_some_and(Page::is_visible) {
            assistant_warn!(index = next, "flow picked a hidden page");
            return false;
        }

        self.history.push(current);
        self.transition_to(next);
        true
    }

    /// Make the first visible page current, or clear the current page.
    fn relocate_to_first_visible(&mut self) {
        match self.pages.first_visible_from(0) {
            Some(index) => self.transition_to(index),
            None => {
                self.current = None;
                self.refresh();
                self.current_page_changed.emit(None);
            }
        }
    }

    /// Make the page at `index` current and run `prepare`.
    ///
    /// If a listener redirects or otherwise starts another transition, the
    /// rest of this one is abandoned.
    fn transition_to(&mut self, index: usize) {
        let Some(id) = self.pages.get_by_index(index) else {
            return;
        };
        let previous = self.current;
        self.current = Some(id);
        self.transitions += 1;
        let serial = self.transitions;
        assistant_trace!(page = %id, index, "preparing page");

        let mut transition = Transition::new(id, index, previous, self.pages.ids().collect());
        self.prepare.emit(&mut transition);
        let (edits, redirect) = transition.into_parts();

        for edit in edits {
            if let Err(err) = self.apply_edit(edit) {
                assistant_warn!(%err, "ignoring page edit from prepare listener");
            }
        }
        if let Some(redirect) = redirect {
            self.follow_redirect(redirect);
        }

        // A nested transition may have left and come back to `id`; it
        // already settled
        if self.current != Some(id) || self.transitions != serial {
            assistant_trace!(page = %id, "transition superseded");
            return;
        }

        self.refresh();
        self.current_page_changed.emit(self.current);
    }

    fn apply_edit(&mut self, edit: PageEdit) -> Result<()> {
        match edit {
            PageEdit::Complete(id, complete) => self.set_page_complete(id, complete),
            PageEdit::Title(id, title) => self.set_page_title(id, title),
            PageEdit::Visible(id, visible) => self.set_page_visible(id, visible),
        }
    }

    fn follow_redirect(&mut self, redirect: Redirect) {
        if self.redirect_depth >= MAX_REDIRECT_DEPTH {
            assistant_error!(?redirect, "too many nested redirects, ignoring");
            return;
        }

        self.redirect_depth += 1;
        let result = match redirect {
            Redirect::Index(index) => self.set_current_page(index),
            Redirect::Page(id) => self.set_current_page_to(id),
        };
        self.redirect_depth -= 1;

        if let Err(err) = result {
            assistant_warn!(%err, "redirect from prepare listener failed");
        }
    }

    fn refresh(&mut self) {
        self.titles = TitleState::compute(&self.pages, self.current);
        self.recompute_actions();
    }

    fn recompute_actions(&mut self) {
        if !self.mapped {
            // Nothing is offered until the assistant is shown
            if self.actions != ActionState::hidden() {
                self.actions = ActionState::hidden();
                self.actions_changed.emit(self.actions);
            }
            return;
        }
        let state = ActionState::derive(&ActionInputs {
            pages: &self.pages,
            flow: self.flow.as_ref(),
            current: self.get_current_page_index(),
            committed: self.committed,
            history_empty: self.history.is_empty(),
        });
        if state != self.actions {
            self.actions = state;
            self.actions_changed.emit(state);
        }
    }
}

impl Drop for Assistant {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Assistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assistant")
            .field("id", &self.id)
            .field("n_pages", &self.pages.len())
            .field("current", &self.current)
            .field("committed", &self.committed)
            .field("mapped", &self.mapped)
            .field("history_depth", &self.history.len())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Assistant: Send, Sync);
