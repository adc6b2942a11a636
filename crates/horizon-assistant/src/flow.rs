//! Forward page functions.
//!
//! A forward page function decides which page follows the current one. The
//! assistant calls it with the index of the current page and a read-only view
//! of the page list; returning `None` means the current page ends the flow.
//!
//! Any closure `Fn(usize, &PageRegistry) -> Option<usize>` is a forward page
//! function. The function owns whatever it captures: replacing it, or dropping
//! the assistant, drops the captures. [`ContextFlow`] keeps the explicit
//! context/teardown pairing for embedders that manage a separate context
//! value, and [`RawFlow`] adapts functions speaking the `-1`-terminated index
//! convention.
//!
//! # Example
//!
//! ```
//! use horizon_assistant::flow::{DefaultFlow, ForwardPageFunc};
//! use horizon_assistant::{Page, PageRegistry};
//! use horizon_assistant_core::PageId;
//!
//! let mut pages = PageRegistry::new();
//! for visible in [true, false, true] {
//!     pages.insert(Page::new(PageId::new()).with_visible(visible), -1).unwrap();
//! }
//!
//! // The default flow skips hidden pages
//! assert_eq!(DefaultFlow.next_page(0, &pages), Some(2));
//! assert_eq!(DefaultFlow.next_page(2, &pages), None);
//!
//! // Any closure works; this one always skips a page
//! let skip_one = |current: usize, pages: &PageRegistry| {
//!     Some(current + 2).filter(|&next| next < pages.len())
//! };
//! assert_eq!(skip_one.next_page(0, &pages), Some(2));
//! ```

use std::fmt;

use horizon_assistant_core::logging::targets;

use crate::registry::PageRegistry;

/// The index returned by `-1`-terminated flow functions to end the flow.
pub const FLOW_END: i32 = -1;

/// Decides the page that follows the current one.
///
/// Implementations must not assume anything about the order in which they
/// are called. They may be called several times per transition, for
/// instance to decide whether the Last action is offered.
pub trait ForwardPageFunc: Send + Sync {
    /// The index of the page after `current`, or `None` at the end of the flow.
    fn next_page(&self, current: usize, pages: &PageRegistry) -> Option<usize>;
}

impl<F> ForwardPageFunc for F
where
    F: Fn(usize, &PageRegistry) -> Option<usize> + Send + Sync,
{
    fn next_page(&self, current: usize, pages: &PageRegistry) -> Option<usize> {
        self(current, pages)
    }
}

/// Run `func` and discard answers that do not name an existing page.
pub(crate) fn resolve_next(
    func: &dyn ForwardPageFunc,
    current: usize,
    pages: &PageRegistry,
) -> Option<usize> {
    let next = func.next_page(current, pages)?;
    if next < pages.len() {
        Some(next)
    } else {
        tracing::trace!(target: targets::FLOW, current, next, len = pages.len(), "flow answered past the end");
        None
    }
}

// ============================================================================
// DefaultFlow
// ============================================================================

/// Advances to the next visible page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultFlow;

impl ForwardPageFunc for DefaultFlow {
    fn next_page(&self, current: usize, pages: &PageRegistry) -> Option<usize> {
        pages.first_visible_from(current + 1)
    }
}

// ============================================================================
// RawFlow
// ============================================================================

/// Adapts a function using signed indices where [`FLOW_END`] (or any negative
/// value) ends the flow.
pub struct RawFlow<F> {
    func: F,
}

impl<F> RawFlow<F>
where
    F: Fn(i32) -> i32 + Send + Sync,
{
    /// Wrap a signed-index flow function.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> ForwardPageFunc for RawFlow<F>
where
    F: Fn(i32) -> i32 + Send + Sync,
{
    fn next_page(&self, current: usize, _pages: &PageRegistry) -> Option<usize> {
        let current = i32::try_from(current).ok()?;
        usize::try_from((self.func)(current)).ok()
    }
}

impl<F> fmt::Debug for RawFlow<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawFlow").finish_non_exhaustive()
    }
}

// ============================================================================
// ContextFlow
// ============================================================================

type Teardown<C> = Box<dyn FnOnce(C) + Send + Sync>;

/// A forward page function paired with an owned context value and an
/// optional teardown hook.
///
/// The teardown hook receives the context when the flow is dropped, which
/// happens when the assistant replaces its flow function or is disposed.
pub struct ContextFlow<C, F> {
    context: Option<C>,
    func: F,
    teardown: Option<Teardown<C>>,
}

impl<C, F> ContextFlow<C, F>
where
    C: Send + Sync,
    F: Fn(usize, &C, &PageRegistry) -> Option<usize> + Send + Sync,
{
    /// Pair `func` with `context`. The context is simply dropped at the end.
    pub fn new(context: C, func: F) -> Self {
        Self {
            context: Some(context),
            func,
            teardown: None,
        }
    }

    /// Set the teardown hook using builder pattern.
    pub fn with_teardown<T>(mut self, teardown: T) -> Self
    where
        T: FnOnce(C) + Send + Sync + 'static,
    {
        self.teardown = Some(Box::new(teardown));
        self
    }

    /// The context value.
    pub fn context(&self) -> Option<&C> {
        self.context.as_ref()
    }
}

impl<C, F> ForwardPageFunc for ContextFlow<C, F>
where
    C: Send + Sync,
    F: Fn(usize, &C, &PageRegistry) -> Option<usize> + Send + Sync,
{
    fn next_page(&self, current: usize, pages: &PageRegistry) -> Option<usize> {
        let context = self.context.as_ref()?;
        (self.func)(current, context, pages)
    }
}

impl<C, F> Drop for ContextFlow<C, F> {
    fn drop(&mut self) {
        if let (Some(context), Some(teardown)) = (self.context.take(), self.teardown.take()) {
            tracing::trace!(target: targets::FLOW, "tearing down flow context");
            teardown(context);
        }
    }
}

impl<C: fmt::Debug, F> fmt::Debug for ContextFlow<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextFlow")
            .field("context", &self.context)
            .field("has_teardown", &self.teardown.is_some())
            .finish()
    }
}
