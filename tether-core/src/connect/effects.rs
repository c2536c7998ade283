//! Positional Effect Slots
//!
//! `side_effect` is the hook-style mechanism a render callback uses to run
//! side-effecting logic exactly once per change of an explicit dependency
//! list.
//!
//! # Slot Identity
//!
//! Slot identity is purely positional: the Nth side-effect call within a
//! render pass maps to the Nth slot recorded by the previous pass, regardless
//! of anything else that changed. The element's render phase carries the
//! counter; it resets to 0 when a pass opens and advances by one per call.
//!
//! Calling `side_effect` a different number of times across renders shifts
//! every later slot against the wrong predecessor. That is undefined behavior
//! for the consumer to avoid (the same hazard class as conditional hook
//! calls); the runtime does not detect or repair it.
//!
//! # Cleanup
//!
//! An effect callback may return a cleanup closure. It is stored in the slot
//! and invoked, with the element, immediately before the slot's effect runs
//! again. An unchanged slot runs neither its cleanup nor its effect. Keeping
//! cleanup as "whatever the effect returns" keeps the hook minimal: an effect
//! with nothing to tear down returns `None`.

use smallvec::SmallVec;
use tracing::trace;

use crate::error::ConnectError;
use crate::value::{deps_equal, Value};

use super::element::{Cleanup, Element, RenderPhase};

/// One positional record of a side-effect call.
pub(crate) struct EffectSlot {
    /// Dependency list from the most recent run.
    pub(crate) dependencies: SmallVec<[Value; 4]>,
    /// Cleanup returned by the most recent run, if any.
    pub(crate) cleanup: Option<Cleanup>,
}

impl Element {
    /// Run a side effect gated on a dependency list.
    ///
    /// Must be called from inside a render pass (i.e. from the render
    /// callback); otherwise fails with [`ConnectError::OutsideLifecycle`].
    ///
    /// The effect runs when this call's positional slot has no previous
    /// dependencies or when the new list is not shallow-equal to the stored
    /// one. Before a re-run, the slot's previous cleanup is invoked. When the
    /// dependencies are unchanged, nothing runs and the slot is retained.
    pub fn side_effect<F>(&self, dependencies: &[Value], effect: F) -> Result<(), ConnectError>
    where
        F: FnOnce(&Element) -> Option<Cleanup>,
    {
        let index = match *self.record.phase.read().expect("phase lock poisoned") {
            RenderPhase::Rendering(index) => index,
            RenderPhase::Idle => return Err(ConnectError::OutsideLifecycle),
        };

        let changed = {
            let slots = self.record.slots.read().expect("slots lock poisoned");
            match slots.get(index) {
                Some(slot) => !deps_equal(&slot.dependencies, dependencies),
                None => true,
            }
        };

        if changed {
            // Take the previous cleanup out before running anything, so the
            // slots lock is never held across user code.
            let previous = {
                let mut slots = self.record.slots.write().expect("slots lock poisoned");
                slots.get_mut(index).and_then(|slot| slot.cleanup.take())
            };

            if let Some(cleanup) = previous {
                trace!(element = %self.id(), slot = index, "effect cleanup");
                cleanup(self);
            }

            trace!(element = %self.id(), slot = index, "effect run");
            let cleanup = effect(self);

            let slot = EffectSlot {
                dependencies: dependencies.iter().cloned().collect(),
                cleanup,
            };

            let mut slots = self.record.slots.write().expect("slots lock poisoned");
            if index < slots.len() {
                slots[index] = slot;
            } else {
                slots.push(slot);
            }
        } else {
            trace!(element = %self.id(), slot = index, "effect retained, deps unchanged");
        }

        *self.record.phase.write().expect("phase lock poisoned") =
            RenderPhase::Rendering(index + 1);

        Ok(())
    }
}
