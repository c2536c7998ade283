//! Render Lifecycle
//!
//! `connect` attaches a render/subscribe loop to one element:
//!
//! 1. Every render reads the store state and projects it into props.
//!
//! 2. Props are memoized by shallow equality: the render callback only runs
//!    on the first render, when the projected props change, or when a render
//!    is forced.
//!
//! 3. While the callback runs, the element is in the `Rendering` phase with
//!    its side-effect counter reset to 0, so hook-style side-effect calls
//!    line up with their positional slots from the previous pass.
//!
//! 4. The constructed render closure is stored on the element (for manual
//!    `rerender`) and subscribed to the store, then invoked once immediately.
//!
//! # Re-entrancy
//!
//! Rendering is fully synchronous. A dispatch from inside a render callback
//! delivers notifications before the dispatch returns, which may start render
//! passes on *other* elements; the runtime does not guard against re-entering
//! the *same* element's render, and doing so is unsupported.
//!
//! # Failure
//!
//! A panicking projection or callback leaves `last_props` and the render
//! phase as they were at the point of failure. There is no rollback.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::ConnectError;
use crate::value::{shallow_equal, Value};

use super::element::{Element, RenderHandle, RenderPhase};
use super::store::{Dispatch, Store};

/// Projects global store state into element-local props.
///
/// Receives the element it is rendering for, the current state, and the
/// stable dispatch handle, so a projection can be written once and bound to
/// many elements.
pub type Projection = Arc<dyn Fn(&Element, &Value, &Dispatch) -> Value + Send + Sync>;

/// Paints or mutates the element from its projected props.
pub type RenderCallback = Arc<dyn Fn(&Element, &Value) + Send + Sync>;

impl Element {
    /// Attach a render lifecycle to this element.
    ///
    /// Builds the render closure, stores it on the element, subscribes it to
    /// the store's change notifications, and runs the unconditional first
    /// render. Returns the render handle; `handle(true)` forces a paint.
    ///
    /// Connecting the same element twice subscribes a second render closure
    /// over the same per-element record (memoized props and effect slots are
    /// shared). Enforcing at-most-once is left to the caller.
    pub fn connect(
        &self,
        callback: RenderCallback,
        projection: Projection,
        store: Arc<dyn Store>,
    ) -> RenderHandle {
        let dispatch = Dispatch::new(Arc::clone(&store));

        let render: RenderHandle = Arc::new({
            let element = self.clone();
            let store = Arc::clone(&store);
            move |force: bool| {
                let state = store.get_state();
                let props = (*projection)(&element, &state, &dispatch);

                let should_render = force || {
                    let last = element
                        .record
                        .last_props
                        .read()
                        .expect("last_props lock poisoned");
                    match last.as_ref() {
                        None => true,
                        Some(previous) => !shallow_equal(&props, previous),
                    }
                };

                if !should_render {
                    trace!(element = %element.id(), "render skipped, props unchanged");
                    return;
                }

                *element
                    .record
                    .last_props
                    .write()
                    .expect("last_props lock poisoned") = Some(props.clone());

                // Open the render pass: side-effect slots index from 0.
                *element.record.phase.write().expect("phase lock poisoned") =
                    RenderPhase::Rendering(0);

                trace!(element = %element.id(), forced = force, "render");
                (*callback)(&element, &props);

                // Close the pass so stray side-effect calls are rejected.
                *element.record.phase.write().expect("phase lock poisoned") = RenderPhase::Idle;
            }
        });

        *self.record.render.write().expect("render lock poisoned") = Some(Arc::clone(&render));

        store.subscribe({
            let render = Arc::clone(&render);
            Arc::new(move || (*render)(false))
        });

        debug!(element = %self.id(), "element connected");
        (*render)(false);

        render
    }

    /// Force a render, bypassing props memoization.
    ///
    /// Fails with [`ConnectError::NotConnected`] if `connect` was never
    /// called on this element.
    pub fn rerender(&self) -> Result<(), ConnectError> {
        let handle = self
            .record
            .render
            .read()
            .expect("render lock poisoned")
            .clone()
            .ok_or(ConnectError::NotConnected)?;

        (*handle)(true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::RwLock;

    use crate::connect::store::MemoryStore;

    /// Store whose reducer replaces the whole state with the action's
    /// `"state"` payload.
    fn replace_store(initial: Value) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new(initial, |state, action| {
            action.get("state").cloned().unwrap_or_else(|| state.clone())
        }))
    }

    fn count_projection() -> Projection {
        Arc::new(|_, state, _| {
            Value::object([(
                "count",
                state.get("count").cloned().unwrap_or(Value::Null),
            )])
        })
    }

    fn recording_callback(calls: Arc<AtomicUsize>) -> RenderCallback {
        Arc::new(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn connect_renders_immediately() {
        let store = replace_store(Value::object([("count", Value::from(0))]));
        let calls = Arc::new(AtomicUsize::new(0));

        let element = Element::new();
        element.connect(
            recording_callback(Arc::clone(&calls)),
            count_projection(),
            store,
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(element.is_connected());
        assert!(!element.is_rendering());
    }

    #[test]
    fn equal_props_skip_the_callback() {
        let store = replace_store(Value::object([("count", Value::from(0))]));
        let calls = Arc::new(AtomicUsize::new(0));

        Element::new().connect(
            recording_callback(Arc::clone(&calls)),
            count_projection(),
            Arc::clone(&store) as Arc<dyn Store>,
        );

        // Same projected props: notification arrives but nothing paints.
        store.dispatch(Value::object([(
            "state",
            Value::object([("count", Value::from(0))]),
        )]));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn changed_props_rerender() {
        let store = replace_store(Value::object([("count", Value::from(0))]));
        let seen = Arc::new(RwLock::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        Element::new().connect(
            Arc::new(move |_, props: &Value| {
                seen_clone
                    .write()
                    .expect("seen lock poisoned")
                    .push(props.get("count").and_then(|v| v.as_f64()));
            }),
            count_projection(),
            Arc::clone(&store) as Arc<dyn Store>,
        );

        store.dispatch(Value::object([(
            "state",
            Value::object([("count", Value::from(1))]),
        )]));

        assert_eq!(
            *seen.read().expect("seen lock poisoned"),
            vec![Some(0.0), Some(1.0)]
        );
    }

    #[test]
    fn rerender_bypasses_memoization() {
        let store = replace_store(Value::object([("count", Value::from(0))]));
        let calls = Arc::new(AtomicUsize::new(0));

        let element = Element::new();
        element.connect(
            recording_callback(Arc::clone(&calls)),
            count_projection(),
            store,
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        element.rerender().expect("connected element");
        element.rerender().expect("connected element");

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn rerender_before_connect_fails() {
        let element = Element::new();

        let err = element.rerender().expect_err("not connected");
        assert!(matches!(err, ConnectError::NotConnected));
    }

    #[test]
    fn render_handle_forces_like_rerender() {
        let store = replace_store(Value::object([("count", Value::from(0))]));
        let calls = Arc::new(AtomicUsize::new(0));

        let handle = Element::new().connect(
            recording_callback(Arc::clone(&calls)),
            count_projection(),
            store,
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        (*handle)(false);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        (*handle)(true);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn element_is_rendering_inside_the_callback() {
        let store = replace_store(Value::Null);
        let observed = Arc::new(AtomicUsize::new(0));

        let observed_clone = Arc::clone(&observed);
        Element::new().connect(
            Arc::new(move |element: &Element, _: &Value| {
                if element.is_rendering() {
                    observed_clone.fetch_add(1, Ordering::SeqCst);
                }
            }),
            Arc::new(|_, state, _| state.clone()),
            store,
        );

        assert_eq!(observed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn last_props_stores_the_projected_value() {
        let store = replace_store(Value::object([("count", Value::from(7))]));

        let element = Element::new();
        element.connect(Arc::new(|_, _| {}), count_projection(), store);

        let props = element.last_props().expect("rendered");
        assert_eq!(props.get("count").and_then(|v| v.as_f64()), Some(7.0));
    }

    #[test]
    fn projection_receives_the_dispatch_handle() {
        let store = replace_store(Value::object([("count", Value::from(0))]));
        let calls = Arc::new(AtomicUsize::new(0));

        // Put a dispatching callable into props, then invoke it after the
        // first render. The resulting state change must trigger a re-render.
        let projection: Projection = Arc::new(|_, state, dispatch| {
            let dispatch = dispatch.clone();
            Value::object([
                ("count", state.get("count").cloned().unwrap_or(Value::Null)),
                (
                    "increment",
                    Value::func(move |_| {
                        dispatch.send(Value::object([(
                            "state",
                            Value::object([("count", Value::from(1))]),
                        )]))
                    }),
                ),
            ])
        });

        let element = Element::new();
        element.connect(
            recording_callback(Arc::clone(&calls)),
            projection,
            Arc::clone(&store) as Arc<dyn Store>,
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let increment = element
            .last_props()
            .and_then(|props| props.get("increment").cloned())
            .expect("callable in props");
        increment.call(&[]);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            element
                .last_props()
                .and_then(|p| p.get("count").and_then(|v| v.as_f64())),
            Some(1.0)
        );
    }
}
