#![forbid(unsafe_code)]

//! Error types for navigation commands.

use crate::controller::ComponentId;

/// Errors reported through a command's listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// The requested id is not in any presented modal, or no modal is presented.
    #[error("Nothing to dismiss")]
    NothingToDismiss,
    /// The controller is already part of the modal stack.
    #[error("component '{0}' is already presented")]
    AlreadyPresented(ComponentId),
    /// The presenter has no container to mount modals into.
    #[error("modal content layout has not been set")]
    NoContentLayout,
    /// Options JSON could not be parsed.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidOptions(err.to_string())
    }
}

/// An [`EventSink`](crate::EventSink) could not deliver an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event sink unavailable: {0}")]
pub struct EmitError(pub String);
