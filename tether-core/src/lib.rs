//! Tether Core
//!
//! This crate provides the core runtime for the Tether element binding
//! framework. It attaches a reactive render lifecycle to individual UI
//! elements, driven by subscription to an external observable state
//! container. It implements:
//!
//! - Per-element render/subscribe loops with shallow-equality props
//!   memoization
//! - Hook-style side effects with positional slots, dependency gating, and
//!   cleanup
//! - A dynamic value model with reference-identity semantics for nested data
//! - A thin command front door (`init` / `rerender` / `sideEffect`)
//!
//! There is no virtual DOM and no scheduler: rendering is synchronous, one
//! element at a time, in store notification order.
//!
//! # Architecture
//!
//! The crate is organized into three modules:
//!
//! - `value`: dynamic values and the shallow-equality primitive
//! - `connect`: the render lifecycle, effect slots, store boundary, and
//!   front door
//! - `error`: the fatal, synchronously raised error kinds
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tether_core::{Element, MemoryStore, Value};
//!
//! let store = Arc::new(MemoryStore::new(
//!     Value::object([("count", Value::from(0))]),
//!     |state, action| action.get("state").cloned().unwrap_or_else(|| state.clone()),
//! ));
//!
//! let element = Element::new();
//! element.connect(
//!     // Paints the element; may register side effects.
//!     Arc::new(|el, props| {
//!         el.side_effect(&[props.get("count").cloned().unwrap_or(Value::Null)], |_| {
//!             println!("count changed");
//!             None
//!         })
//!         .unwrap();
//!     }),
//!     // Projects global state into element-local props.
//!     Arc::new(|_, state, _| {
//!         Value::object([("count", state.get("count").cloned().unwrap_or(Value::Null))])
//!     }),
//!     store.clone(),
//! );
//!
//! // Re-renders only when the projected props change.
//! store.dispatch(Value::object([("state", Value::object([("count", Value::from(1))]))]));
//! ```

pub mod connect;
pub mod error;
pub mod value;

pub use connect::{Binder, Command, Dispatch, Element, ElementId, MemoryStore, Store};
pub use error::ConnectError;
pub use value::{shallow_equal, Value};
