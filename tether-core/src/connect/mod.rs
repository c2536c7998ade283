//! Element Connect Runtime
//!
//! This module implements the per-element reactive render lifecycle: binding
//! a UI element to an external observable store, re-rendering it only when
//! its projected props actually change, and running positional,
//! dependency-gated side effects inside each render pass.
//!
//! # Concepts
//!
//! ## Connect
//!
//! `connect` derives "props" for one element from global store state through
//! a projection function, memoizes them by shallow equality, and invokes the
//! render callback only when they differ (or when a render is forced). The
//! render closure it builds is stored on the element and subscribed to the
//! store, so every dispatch drives every connected element's decision to
//! repaint.
//!
//! ## Side Effects
//!
//! Inside a render pass, the callback may call `side_effect` any fixed
//! number of times. Each call owns a positional slot that remembers its
//! dependency list and cleanup across renders, mirroring the lifecycle of a
//! hooks-style component without a virtual-DOM renderer.
//!
//! ## Front Door
//!
//! Hosts that address elements by name and ID go through [`Command`] /
//! [`Binder`], which validate at the boundary and route into the typed
//! operations.
//!
//! # Execution Model
//!
//! Everything is synchronous and callback-driven: a dispatch notifies
//! subscribed render closures in subscription order, each render pass runs to
//! completion, and effect cleanup/callback order within a pass is strictly
//! sequential. There is no batching across elements, no scheduling, and no
//! asynchronous rendering.

mod command;
mod effects;
mod element;
mod render;
mod store;

pub use command::{apply, Binder, Command, CommandKind, EffectFn};
pub use element::{Cleanup, Element, ElementId, RenderHandle, RenderPhase};
pub use render::{Projection, RenderCallback};
pub use store::{Dispatch, Listener, MemoryStore, Reducer, Store, SubscriptionId};
