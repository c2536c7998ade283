//! Error types for the connect runtime.
//!
//! All errors are fatal and raised synchronously from the call that caused
//! them. Nothing is retried or swallowed: a failed attach, an out-of-lifecycle
//! side effect, or an unrecognized front-door action propagates straight back
//! to the caller.
//!
//! There is no partial-failure recovery. A render callback that panics leaves
//! the element's stored props and effect slots exactly as they were at the
//! point of failure; the runtime does not roll back a half-finished pass.

use thiserror::Error;

use crate::connect::ElementId;

/// Errors raised by the connect lifecycle and its front door.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// `init` was invoked without a required collaborator.
    ///
    /// `missing` names the absent argument (`"store"` or `"projection"`).
    #[error("connect: no {missing} provided")]
    Configuration { missing: &'static str },

    /// A side effect was invoked while no render pass was active for the
    /// element.
    #[error("connect: cannot call \"sideEffect\" outside the connect lifecycle")]
    OutsideLifecycle,

    /// `rerender` was invoked on an element that was never connected.
    #[error("connect: \"rerender\" called before init")]
    NotConnected,

    /// The front door received an action name it does not implement.
    #[error("connect: do not recognize action \"{0}\"")]
    UnrecognizedAction(String),

    /// The binder has no element registered under this id.
    #[error("connect: no element bound for id {0}")]
    UnknownElement(ElementId),
}
