//! The ordered page list.
//!
//! [`PageRegistry`] owns the sequence of [`Page`]s of one assistant. Pages are
//! addressed by identity; indices are positions and shift whenever a page is
//! inserted or removed in front of them.
//!
//! The registry is deliberately ignorant of navigation. Its setters report
//! whether anything changed and leave it to the controller to recompute the
//! action state.

use horizon_assistant_core::logging::targets;
use horizon_assistant_core::{AssistantError, PageId, Result};

use crate::page::{Page, PageAttribute, PageKind};

/// The ordered collection of pages of one assistant.
#[derive(Debug, Clone, Default)]
pub struct PageRegistry {
    pages: Vec<Page>,
}

impl PageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `page` at `position`.
    ///
    /// A negative position or one past the end appends. Returns the index the
    /// page landed at.
    pub fn insert(&mut self, page: Page, position: i32) -> Result<usize> {
        if self.contains(page.id()) {
            tracing::warn!(target: targets::REGISTRY, page = %page.id(), "duplicate page identity");
            return Err(AssistantError::DuplicateIdentity(page.id()));
        }

        let len = self.pages.len();
        let index = if position < 0 {
            len
        } else {
            (position as usize).min(len)
        };

        tracing::trace!(target: targets::REGISTRY, page = %page.id(), index, "inserting page");
        self.pages.insert(index, page);
        Ok(index)
    }

    /// Remove a page by identity.
    ///
    /// Returns the index it occupied and its metadata, or `None` if the
    /// identity is unknown.
    pub fn remove(&mut self, id: PageId) -> Option<(usize, Page)> {
        let index = self.index_of(id)?;
        tracing::trace!(target: targets::REGISTRY, page = %id, index, "removing page");
        Some((index, self.pages.remove(index)))
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether there are no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Whether the identity is registered.
    pub fn contains(&self, id: PageId) -> bool {
        self.pages.iter().any(|p| p.id() == id)
    }

    /// Identity of the page at `index`.
    pub fn get_by_index(&self, index: usize) -> Option<PageId> {
        self.pages.get(index).map(Page::id)
    }

    /// Index of the page with identity `id`.
    pub fn index_of(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id() == id)
    }

    /// Page metadata by identity.
    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id() == id)
    }

    /// Page metadata by index.
    pub fn page_at(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Iterate over the pages in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }

    /// Iterate over the page identities in order.
    pub fn ids(&self) -> impl Iterator<Item = PageId> + '_ {
        self.pages.iter().map(Page::id)
    }

    /// Index of the first visible page at or after `start`.
    pub fn first_visible_from(&self, start: usize) -> Option<usize> {
        self.pages
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, p)| p.is_visible())
            .map(|(i, _)| i)
    }

    // =========================================================================
    // Attribute setters
    // =========================================================================

    fn get_mut(&mut self, id: PageId) -> Result<&mut Page> {
        match self.pages.iter_mut().find(|p| p.id() == id) {
            Some(page) => Ok(page),
            None => {
                tracing::warn!(target: targets::REGISTRY, page = %id, "unknown page identity");
                Err(AssistantError::InvalidPageIdentity(id))
            }
        }
    }

    /// Set the page kind.
    ///
    /// Returns the changed attributes: turning a page into a summary page may
    /// also mark it complete.
    pub fn set_kind(&mut self, id: PageId, kind: PageKind) -> Result<Vec<PageAttribute>> {
        let page = self.get_mut(id)?;
        let was_complete = page.is_complete();
        if !page.set_kind(kind) {
            return Ok(Vec::new());
        }
        let mut changed = vec![PageAttribute::Kind];
        if page.is_complete() != was_complete {
            changed.push(PageAttribute::Complete);
        }
        Ok(changed)
    }

    /// Set the page title. Returns `true` if it changed.
    pub fn set_title(&mut self, id: PageId, title: Option<String>) -> Result<bool> {
        Ok(self.get_mut(id)?.set_title(title))
    }

    /// Set the completion flag. Returns `true` if it changed.
    pub fn set_complete(&mut self, id: PageId, complete: bool) -> Result<bool> {
        Ok(self.get_mut(id)?.set_complete(complete))
    }

    /// Set the visibility. Returns `true` if it changed.
    pub fn set_visible(&mut self, id: PageId, visible: bool) -> Result<bool> {
        Ok(self.get_mut(id)?.set_visible(visible))
    }

    /// Set the padding hint. Returns `true` if it changed.
    pub fn set_has_padding(&mut self, id: PageId, has_padding: bool) -> Result<bool> {
        Ok(self.get_mut(id)?.set_has_padding(has_padding))
    }
}

impl<'a> IntoIterator for &'a PageRegistry {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}
