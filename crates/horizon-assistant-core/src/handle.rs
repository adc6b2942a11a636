//! Page and assistant identities.
//!
//! Pages are referred to everywhere by a [`PageId`]: an opaque, stable handle
//! chosen by the embedder. Positions in an assistant's page list change as
//! pages are inserted and removed; identities never do.
//!
//! A page may belong to at most one assistant at a time. Ownership is tracked
//! in a process-wide table so that inserting a page that is already parented
//! by another assistant can be rejected, the same way a widget cannot be
//! packed into two containers.
//!
//! # Example
//!
//! ```
//! use horizon_assistant_core::handle::{self, AssistantId, PageId};
//!
//! let owner = AssistantId::new();
//! let page = PageId::new();
//!
//! assert!(handle::claim(page, owner).is_ok());
//! assert_eq!(handle::owner_of(page), Some(owner));
//!
//! handle::release(page, owner);
//! assert_eq!(handle::owner_of(page), None);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::logging::targets;

/// Next value handed out by [`PageId::new`].
///
/// Starts high so that automatically allocated ids do not collide with small
/// embedder-chosen raw values.
static NEXT_PAGE_ID: AtomicU64 = AtomicU64::new(1 << 32);

/// Next value handed out by [`AssistantId::new`].
static NEXT_ASSISTANT_ID: AtomicU64 = AtomicU64::new(1);

/// Which assistant currently owns which page.
static PAGE_OWNERS: Mutex<Option<HashMap<PageId, AssistantId>>> = Mutex::new(None);

/// Stable identity of a page.
///
/// Use [`PageId::new`] for a fresh, process-unique handle, or
/// [`PageId::from_raw`] when the embedder already has its own numbering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(u64);

impl PageId {
    /// Allocate a fresh page identity.
    pub fn new() -> Self {
        Self(NEXT_PAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an embedder-chosen raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value of this identity.
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageId({})", self.0)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

/// Identity of one assistant (flow controller) instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssistantId(u64);

impl AssistantId {
    /// Allocate a fresh assistant identity.
    pub fn new() -> Self {
        Self(NEXT_ASSISTANT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw value of this identity.
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl Default for AssistantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AssistantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssistantId({})", self.0)
    }
}

impl fmt::Display for AssistantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "assistant#{}", self.0)
    }
}

/// Record `owner` as the parent of `page`.
///
/// Claiming a page the same owner already holds succeeds. If another
/// assistant owns the page, that owner is returned as the error.
pub fn claim(page: PageId, owner: AssistantId) -> Result<(), AssistantId> {
    let mut guard = PAGE_OWNERS.lock();
    let owners = guard.get_or_insert_with(HashMap::new);
    match owners.get(&page) {
        Some(&existing) if existing != owner => {
            tracing::trace!(target: targets::HANDLE, %page, %owner, %existing, "page already owned");
            Err(existing)
        }
        _ => {
            owners.insert(page, owner);
            Ok(())
        }
    }
}

/// Drop `owner`'s claim on `page`.
///
/// Returns `true` if the claim existed. A claim held by a different owner is
/// left alone.
pub fn release(page: PageId, owner: AssistantId) -> bool {
    let mut guard = PAGE_OWNERS.lock();
    let Some(owners) = guard.as_mut() else {
        return false;
    };
    if owners.get(&page) == Some(&owner) {
        owners.remove(&page);
        true
    } else {
        false
    }
}

/// Drop every claim held by `owner`. Returns how many were released.
pub fn release_all(owner: AssistantId) -> usize {
    let mut guard = PAGE_OWNERS.lock();
    let Some(owners) = guard.as_mut() else {
        return 0;
    };
    let before = owners.len();
    owners.retain(|_, o| *o != owner);
    before - owners.len()
}

/// The assistant currently owning `page`, if any.
pub fn owner_of(page: PageId) -> Option<AssistantId> {
    PAGE_OWNERS
        .lock()
        .as_ref()
        .and_then(|owners| owners.get(&page).copied())
}

static_assertions::assert_impl_all!(PageId: Send, Sync, Copy);
static_assertions::assert_impl_all!(AssistantId: Send, Sync, Copy);
