//! Element Handles
//!
//! An [`Element`] is the opaque handle for one bound UI element. It owns the
//! per-element state the runtime persists across renders: the stored render
//! handle, the last-rendered props, the ordered effect slots, and the current
//! render phase.
//!
//! The record is strongly typed and owned by the handle itself, so every
//! clone of an `Element` addresses the same state. Callbacks receive the
//! element as an explicit argument; there is no ambient "current element"
//! context.
//!
//! # Lifetime
//!
//! The record lives as long as any handle to it. There is no explicit
//! teardown: store subscriptions taken out by `connect` are permanent for the
//! lifetime of the element (a documented limitation of the runtime).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::value::Value;

use super::effects::EffectSlot;

/// Counter for generating unique element IDs.
static ELEMENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique identifier for a bound element.
///
/// Uses an atomic counter to ensure uniqueness across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    /// Generate a new unique element ID.
    pub fn new() -> Self {
        Self(ELEMENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an element is in its render lifecycle.
///
/// `Rendering` carries the side-effect counter for the active pass: it starts
/// at 0 when a pass begins and advances by one per side-effect call. Outside
/// a pass the element is `Idle` and side-effect calls are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    /// No render pass is active.
    Idle,
    /// A render pass is active; the payload is the next effect-slot index.
    Rendering(usize),
}

/// A stored render closure. `render(true)` forces a paint even when the
/// projected props are unchanged.
pub type RenderHandle = Arc<dyn Fn(bool) + Send + Sync>;

/// Cleanup returned by an effect callback, invoked with the element before
/// the effect re-runs.
pub type Cleanup = Box<dyn FnOnce(&Element) + Send + Sync>;

/// Per-element persisted state.
pub(crate) struct ElementRecord {
    /// The render handle stored by `connect`, retrieved by `rerender`.
    pub(crate) render: RwLock<Option<RenderHandle>>,
    /// Props used for the previous paint. `None` means never rendered;
    /// `Some(Value::Null)` means rendered with no props.
    pub(crate) last_props: RwLock<Option<Value>>,
    /// Positional effect slots, in call order.
    pub(crate) slots: RwLock<Vec<EffectSlot>>,
    /// Current lifecycle phase.
    pub(crate) phase: RwLock<RenderPhase>,
}

impl ElementRecord {
    fn new() -> Self {
        Self {
            render: RwLock::new(None),
            last_props: RwLock::new(None),
            slots: RwLock::new(Vec::new()),
            phase: RwLock::new(RenderPhase::Idle),
        }
    }
}

/// Opaque handle identifying one bound UI element.
///
/// Cheap to clone; all clones share the same per-element state.
#[derive(Clone)]
pub struct Element {
    id: ElementId,
    pub(crate) record: Arc<ElementRecord>,
}

impl Element {
    /// Create a fresh, unconnected element handle.
    pub fn new() -> Self {
        Self {
            id: ElementId::new(),
            record: Arc::new(ElementRecord::new()),
        }
    }

    /// Get the element's unique ID.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Whether `connect` has stored a render handle on this element.
    pub fn is_connected(&self) -> bool {
        self.record
            .render
            .read()
            .expect("render lock poisoned")
            .is_some()
    }

    /// Whether a render pass is currently active.
    pub fn is_rendering(&self) -> bool {
        matches!(
            *self.record.phase.read().expect("phase lock poisoned"),
            RenderPhase::Rendering(_)
        )
    }

    /// The props used for the previous paint, if the element has rendered.
    pub fn last_props(&self) -> Option<Value> {
        self.record
            .last_props
            .read()
            .expect("last_props lock poisoned")
            .clone()
    }

    /// Number of effect slots recorded by past render passes.
    pub fn effect_slot_count(&self) -> usize {
        self.record.slots.read().expect("slots lock poisoned").len()
    }
}

impl Default for Element {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Element {}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .field("rendering", &self.is_rendering())
            .field("effect_slots", &self.effect_slot_count())
            .finish()
    }
}
