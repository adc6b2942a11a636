//! Signal system for Horizon Assistant.
//!
//! This module provides the event bus the flow controller uses to tell the
//! embedder what happened: a page is about to be shown, data was applied, the
//! flow was closed or cancelled.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - Notification signal; slots observe `&Args`
//! - [`InterceptSignal<Args>`] - Signal whose slots receive `&mut Args` and may
//!   stop the emission by returning [`Propagation::Stop`]
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//!
//! Slots run synchronously on the emitting thread, in the order they were
//! connected. The connection table is not locked while slots run, so a slot
//! may connect or disconnect other slots; such changes take effect from the
//! next emission.
//!
//! # Example
//!
//! ```
//! use horizon_assistant_core::Signal;
//!
//! // Create a signal that passes a string argument
//! let title_changed = Signal::<String>::new();
//!
//! // Connect a slot (closure)
//! let conn_id = title_changed.connect(|title| {
//!     println!("Title changed to: {}", title);
//! });
//!
//! // Emit the signal
//! title_changed.emit("Welcome".to_string());
//!
//! // Disconnect when done
//! title_changed.disconnect(conn_id);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`]. The ID remains valid until the connection is
    /// explicitly disconnected or the signal is dropped.
    pub struct ConnectionId;
}

/// What an intercepting slot wants to happen after it returns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagation {
    /// Keep invoking the remaining slots.
    #[default]
    Continue,
    /// Do not invoke any further slots for this emission.
    Stop,
}

impl Propagation {
    /// Whether this is [`Propagation::Stop`].
    pub fn is_stop(self) -> bool {
        self == Self::Stop
    }
}

/// Internal storage for a single connection.
struct Connection<S: ?Sized> {
    /// The slot function to invoke.
    slot: Arc<S>,
    /// Connection order, used to invoke slots in the order they were connected.
    sequence: u64,
}

/// Connection table shared by [`Signal`] and [`InterceptSignal`].
struct Slots<S: ?Sized> {
    connections: Mutex<SlotMap<ConnectionId, Connection<S>>>,
    blocked: AtomicBool,
    sequence: AtomicU64,
}

impl<S: ?Sized> Slots<S> {
    fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
        }
    }

    fn insert(&self, slot: Arc<S>) -> ConnectionId {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.connections.lock().insert(Connection { slot, sequence })
    }

    fn remove(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    fn clear(&self) {
        self.connections.lock().clear();
    }

    fn len(&self) -> usize {
        self.connections.lock().len()
    }

    /// Snapshot the slots in connection order, releasing the lock before
    /// any of them is invoked.
    fn snapshot(&self) -> Vec<Arc<S>> {
        let connections = self.connections.lock();
        let mut ordered: Vec<_> = connections
            .values()
            .map(|conn| (conn.sequence, conn.slot.clone()))
            .collect();
        drop(connections);
        ordered.sort_by_key(|(sequence, _)| *sequence);
        ordered.into_iter().map(|(_, slot)| slot).collect()
    }
}

type NotifySlot<Args> = dyn Fn(&Args) + Send + Sync;
type InterceptSlot<Args> = dyn Fn(&mut Args) -> Propagation + Send + Sync;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(PageId, PageAttribute)` for several.
pub struct Signal<Args> {
    slots: Slots<NotifySlot<Args>>,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self { slots: Slots::new() }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.remove(id)
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.slots.clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.slots.len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` will do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.slots.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.slots.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots in connection order.
    ///
    /// If the signal is blocked, this does nothing.
    #[tracing::instrument(skip_all, target = "horizon_assistant_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return;
        }

        let slots = self.slots.snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");
        for slot in slots {
            slot(&args);
        }
    }
}

/// A signal whose slots can modify the emitted value and stop the emission.
///
/// Slots are invoked in connection order with a mutable reference to the
/// same value. The first slot returning [`Propagation::Stop`] ends the
/// emission; the remaining slots are not called.
pub struct InterceptSignal<Args> {
    slots: Slots<InterceptSlot<Args>>,
}

impl<Args> Default for InterceptSignal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> InterceptSignal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self { slots: Slots::new() }
    }

    /// Connect an intercepting slot.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&mut Args) -> Propagation + Send + Sync + 'static,
    {
        self.slots.insert(Arc::new(slot))
    }

    /// Connect a slot that only observes the value and never stops the emission.
    pub fn connect_observer<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connect(move |args: &mut Args| {
            slot(args);
            Propagation::Continue
        })
    }

    /// Disconnect a specific slot by its connection ID.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.remove(id)
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.slots.clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.slots.len()
    }

    /// Block signal emission temporarily.
    pub fn set_blocked(&self, blocked: bool) {
        self.slots.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.slots.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal with a mutable value.
    ///
    /// Returns [`Propagation::Stop`] if a slot stopped the emission.
    #[tracing::instrument(skip_all, target = "horizon_assistant_core::signal", level = "trace")]
    pub fn emit(&self, args: &mut Args) -> Propagation {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return Propagation::Continue;
        }

        let slots = self.slots.snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting intercept signal");
        for slot in slots {
            if slot(&mut *args).is_stop() {
                tracing::trace!(target: targets::SIGNAL, "emission stopped by slot");
                return Propagation::Stop;
            }
        }
        Propagation::Continue
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(InterceptSignal<u32>: Send, Sync);
