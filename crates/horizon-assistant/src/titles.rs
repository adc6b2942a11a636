//! Title strip state.
//!
//! Renderers commonly list the page titles in a sidebar, with the current
//! page's title highlighted. [`TitleState`] tells them which titles to show.

use horizon_assistant_core::PageId;

use crate::registry::PageRegistry;

/// Title visibility of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleEntry {
    /// The page.
    pub page: PageId,
    /// Whether the regular (non-highlighted) title is shown.
    pub regular_visible: bool,
    /// Whether the highlighted title of the current page is shown.
    pub current_visible: bool,
}

impl TitleEntry {
    /// Whether either form of the title is shown.
    pub fn is_shown(&self) -> bool {
        self.regular_visible || self.current_visible
    }
}

/// Which page titles the strip shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleState {
    entries: Vec<TitleEntry>,
}

impl TitleState {
    /// Compute the title state for `pages` with `current` highlighted.
    ///
    /// Runs of consecutive equal titles are shown once. The current page's
    /// title always shows when it has one, so a run containing it shows only
    /// the highlighted title.
    pub fn compute(pages: &PageRegistry, current: Option<PageId>) -> Self {
        let all: Vec<_> = pages.iter().collect();
        let entries = all
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let mut shown = page.has_title() && page.is_visible();

                if current == Some(page.id()) {
                    return TitleEntry {
                        page: page.id(),
                        regular_visible: false,
                        current_visible: shown,
                    };
                }

                if i > 0 && all[i - 1].title() == page.title() {
                    shown = false;
                }
                let run_holds_current = all[i + 1..]
                    .iter()
                    .take_while(|other| other.title() == page.title())
                    .any(|other| current == Some(other.id()));
                if run_holds_current {
                    shown = false;
                }

                TitleEntry {
                    page: page.id(),
                    regular_visible: shown,
                    current_visible: false,
                }
            })
            .collect();

        Self { entries }
    }

    /// Whether the strip should be shown at all.
    pub fn is_visible(&self) -> bool {
        self.entries.iter().any(TitleEntry::is_shown)
    }

    /// Per-page entries in page order.
    pub fn entries(&self) -> &[TitleEntry] {
        &self.entries
    }

    /// The entry of one page.
    pub fn entry(&self, page: PageId) -> Option<&TitleEntry> {
        self.entries.iter().find(|e| e.page == page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    fn registry(titles: &[Option<&str>]) -> (PageRegistry, Vec<PageId>) {
        let mut pages = PageRegistry::new();
        let mut ids = Vec::new();
        for title in titles {
            let id = PageId::new();
            let mut page = Page::new(id);
            if let Some(title) = title {
                page = page.with_title(*title);
            }
            pages.insert(page, -1).unwrap();
            ids.push(id);
        }
        (pages, ids)
    }

    #[test]
    fn test_untitled_pages_hide_strip() {
        let (pages, ids) = registry(&[None, Some("")]);
        let state = TitleState::compute(&pages, Some(ids[0]));
        assert!(!state.is_visible());
    }

    #[test]
    fn test_current_title_highlighted() {
        let (pages, ids) = registry(&[Some("Welcome"), Some("Options")]);
        let state = TitleState::compute(&pages, Some(ids[1]));

        let first = state.entry(ids[0]).unwrap();
        assert!(first.regular_visible);
        assert!(!first.current_visible);

        let second = state.entry(ids[1]).unwrap();
        assert!(!second.regular_visible);
        assert!(second.current_visible);
        assert!(state.is_visible());
    }

    #[test]
    fn test_equal_titles_collapse() {
        let (pages, ids) = registry(&[Some("Setup"), Some("Setup"), Some("Setup"), Some("Done")]);

        let state = TitleState::compute(&pages, Some(ids[3]));
        let shown: Vec<_> = state.entries().iter().map(TitleEntry::is_shown).collect();
        assert_eq!(shown, vec![true, false, false, true]);

        // The run holding the current page shows only the highlighted title
        let state = TitleState::compute(&pages, Some(ids[2]));
        let shown: Vec<_> = state.entries().iter().map(TitleEntry::is_shown).collect();
        assert_eq!(shown, vec![false, false, true, true]);
        assert!(state.entry(ids[2]).unwrap().current_visible);
    }

    #[test]
    fn test_hidden_page_title() {
        let mut pages = PageRegistry::new();
        let id = PageId::new();
        pages
            .insert(Page::new(id).with_title("Secret").with_visible(false), -1)
            .unwrap();
        let state = TitleState::compute(&pages, None);
        assert!(!state.is_visible());
    }
}
