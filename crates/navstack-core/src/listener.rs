#![forbid(unsafe_code)]

//! One-shot command listeners.
//!
//! Every stack-mutating command carries a [`CommandListener`] that must be
//! completed exactly once, with either a success or an error.
//!
//! # Invariants
//!
//! - `on_success` and `on_error` consume the listener, so it can never be
//!   completed twice or with both outcomes.
//! - A listener dropped without being completed logs a warning. That is the
//!   only half of "exactly once" the type system cannot enforce.

use std::fmt;

use crate::controller::ComponentId;
use crate::error::NavError;

/// Outcome delivered to a [`CommandListener`].
pub type CommandResult = Result<ComponentId, NavError>;

/// Success/error callback bound to a single navigation command.
pub struct CommandListener {
    callback: Option<Box<dyn FnOnce(CommandResult)>>,
}

impl CommandListener {
    /// Wrap a callback receiving the command's result.
    pub fn new(callback: impl FnOnce(CommandResult) + 'static) -> Self {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// A listener that ignores its result.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Complete the command successfully for `id`.
    pub fn on_success(mut self, id: &ComponentId) {
        self.complete(Ok(id.clone()));
    }

    /// Fail the command.
    pub fn on_error(mut self, error: NavError) {
        tracing::debug!(%error, "command failed");
        self.complete(Err(error));
    }

    fn complete(&mut self, result: CommandResult) {
        if let Some(callback) = self.callback.take() {
            callback(result);
        }
    }
}

impl Drop for CommandListener {
    fn drop(&mut self) {
        if self.callback.is_some() {
            tracing::warn!("command listener dropped without a result");
        }
    }
}

impl fmt::Debug for CommandListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandListener")
            .field("pending", &self.callback.is_some())
            .finish()
    }
}
