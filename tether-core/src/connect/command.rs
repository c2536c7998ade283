//! Command Front Door
//!
//! External callers drive the runtime through three commands: `init`,
//! `rerender`, and `sideEffect`. The front door is deliberately thin: it
//! validates at the boundary (required collaborators present, action name
//! recognized, element known) and routes into the typed operations on
//! [`Element`]. None of the lifecycle logic lives here.
//!
//! [`Binder`] is the registry half of the front door: it maps element IDs to
//! handles so a host can address elements it does not hold directly.

use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::error::ConnectError;
use crate::value::Value;

use super::element::{Cleanup, Element, ElementId, RenderHandle};
use super::render::{Projection, RenderCallback};
use super::store::Store;

/// A reusable side-effect callback, invocable against many elements.
pub type EffectFn = Arc<dyn Fn(&Element) -> Option<Cleanup> + Send + Sync>;

/// One front-door action, validated at the boundary.
#[derive(Clone)]
pub enum Command {
    /// Attach a render lifecycle. The collaborators are optional here so the
    /// boundary can report which one a caller failed to supply.
    Init {
        callback: RenderCallback,
        projection: Option<Projection>,
        store: Option<Arc<dyn Store>>,
    },
    /// Force a render through the stored handle.
    Rerender,
    /// Run a dependency-gated side effect (only valid during a render pass).
    SideEffect {
        effect: EffectFn,
        dependencies: Vec<Value>,
    },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Init { .. } => CommandKind::Init,
            Command::Rerender => CommandKind::Rerender,
            Command::SideEffect { .. } => CommandKind::SideEffect,
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Init { projection, store, .. } => f
                .debug_struct("Init")
                .field("projection", &projection.is_some())
                .field("store", &store.is_some())
                .finish(),
            Command::Rerender => f.write_str("Rerender"),
            Command::SideEffect { dependencies, .. } => f
                .debug_struct("SideEffect")
                .field("dependencies", dependencies)
                .finish(),
        }
    }
}

/// The three action names the front door recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Init,
    Rerender,
    SideEffect,
}

impl CommandKind {
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Init => "init",
            CommandKind::Rerender => "rerender",
            CommandKind::SideEffect => "sideEffect",
        }
    }
}

impl FromStr for CommandKind {
    type Err = ConnectError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "init" => Ok(CommandKind::Init),
            "rerender" => Ok(CommandKind::Rerender),
            "sideEffect" => Ok(CommandKind::SideEffect),
            other => Err(ConnectError::UnrecognizedAction(other.to_owned())),
        }
    }
}

/// Route a command to its operation on one element.
///
/// `Init` returns the constructed render handle; the other commands return
/// `None`.
pub fn apply(element: &Element, command: Command) -> Result<Option<RenderHandle>, ConnectError> {
    match command {
        Command::Init {
            callback,
            projection,
            store,
        } => {
            let projection = projection.ok_or(ConnectError::Configuration {
                missing: "projection",
            })?;
            let store = store.ok_or(ConnectError::Configuration { missing: "store" })?;
            Ok(Some(element.connect(callback, projection, store)))
        }
        Command::Rerender => {
            element.rerender()?;
            Ok(None)
        }
        Command::SideEffect {
            effect,
            dependencies,
        } => {
            element.side_effect(&dependencies, |el| (*effect)(el))?;
            Ok(None)
        }
    }
}

/// Registry front door: element IDs to handles.
pub struct Binder {
    elements: DashMap<ElementId, Element>,
}

impl Binder {
    pub fn new() -> Self {
        Self {
            elements: DashMap::new(),
        }
    }

    /// Create a fresh element and register it.
    pub fn create(&self) -> Element {
        let element = Element::new();
        self.bind(element.clone());
        element
    }

    /// Register an externally created element handle.
    pub fn bind(&self, element: Element) {
        debug!(element = %element.id(), "element bound");
        self.elements.insert(element.id(), element);
    }

    /// Look up an element by ID.
    pub fn get(&self, id: ElementId) -> Option<Element> {
        self.elements.get(&id).map(|entry| entry.value().clone())
    }

    /// Route a command to the element registered under `id`.
    pub fn apply(
        &self,
        id: ElementId,
        command: Command,
    ) -> Result<Option<RenderHandle>, ConnectError> {
        let element = self.get(id).ok_or(ConnectError::UnknownElement(id))?;
        apply(&element, command)
    }

    /// Route a command to every registered element, in unspecified order.
    ///
    /// Stops at the first failure.
    pub fn apply_all(&self, command: &Command) -> Result<(), ConnectError> {
        for entry in self.elements.iter() {
            apply(entry.value(), command.clone())?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}
