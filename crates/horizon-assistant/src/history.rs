//! Back-navigation history.

use horizon_assistant_core::logging::targets;
use horizon_assistant_core::PageId;

use crate::page::PageKind;
use crate::registry::PageRegistry;

/// Last-in-first-out record of the pages the user advanced through.
///
/// The stack is unbounded; it is emptied by [`Assistant::commit`] and when
/// the assistant is unmapped.
///
/// [`Assistant::commit`]: crate::Assistant::commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStack {
    /// Bottom of the stack first.
    entries: Vec<PageId>,
}

impl HistoryStack {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as the page being left by forward navigation.
    pub fn push(&mut self, id: PageId) {
        self.entries.push(id);
    }

    /// Pop the most recent page the user can return to.
    ///
    /// Entries for pages that are gone, hidden, or progress pages are
    /// discarded on the way down.
    pub fn pop_visible_non_progress(&mut self, pages: &PageRegistry) -> Option<PageId> {
        while let Some(id) = self.entries.pop() {
            match pages.get(id) {
                Some(page) if page.is_visible() && page.kind() != PageKind::Progress => {
                    return Some(id);
                }
                _ => {
                    tracing::trace!(target: targets::HISTORY, page = %id, "skipping history entry");
                }
            }
        }
        None
    }

    /// Remove every entry for `id`. Returns how many were removed.
    pub fn purge(&mut self, id: PageId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|&entry| entry != id);
        before - self.entries.len()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn peek(&self) -> Option<PageId> {
        self.entries.last().copied()
    }

    /// Whether `id` appears anywhere in the history.
    pub fn contains(&self, id: PageId) -> bool {
        self.entries.contains(&id)
    }

    /// Iterate from the most recent entry to the oldest.
    pub fn iter(&self) -> impl Iterator<Item = PageId> + '_ {
        self.entries.iter().rev().copied()
    }

    /// The entries, most recent first.
    pub fn to_vec(&self) -> Vec<PageId> {
        self.iter().collect()
    }
}
