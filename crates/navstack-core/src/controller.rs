#![forbid(unsafe_code)]

//! Presentable view controllers.
//!
//! A [`ViewController`] is one node of the navigation tree: a single screen,
//! or a navigator that owns nested controllers. The modal stack only ever
//! sees the trait, never a concrete type.
//!
//! # Invariants
//!
//! - A [`ComponentId`] is unique among live controllers.
//! - `find_controller_by_id` searches the controller itself and its whole
//!   subtree, returning the first match in child order.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::listener::CommandListener;
use crate::options::Options;

/// Opaque identifier of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Create an id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ComponentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ComponentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ComponentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Shared handle to a controller.
///
/// The factory that built the controller keeps ownership; navigation
/// components hold clones of this handle.
pub type ControllerRef = Rc<dyn ViewController>;

/// Result of offering a back press to a controller.
#[must_use]
pub enum BackOutcome {
    /// The controller handled the back press and owns the listener now.
    Consumed,
    /// The controller declined; the listener is handed back untouched.
    Declined(CommandListener),
}

impl BackOutcome {
    /// Whether the back press was handled.
    #[inline]
    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed)
    }
}

impl fmt::Debug for BackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Consumed => f.write_str("Consumed"),
            Self::Declined(_) => f.write_str("Declined"),
        }
    }
}

/// A presentable screen or navigator.
pub trait ViewController {
    /// Unique id of this controller.
    fn id(&self) -> &ComponentId;

    /// Human-readable component name, as registered by the embedder.
    fn name(&self) -> &str;

    /// Offer a device back press.
    ///
    /// Controllers with their own back stack pop it and return
    /// [`BackOutcome::Consumed`], completing `listener` themselves. The
    /// default declines.
    fn handle_back(&self, listener: CommandListener) -> BackOutcome {
        BackOutcome::Declined(listener)
    }

    /// Tear down the controller and everything beneath it.
    fn destroy(&self);

    /// Find `id` in this controller's subtree, including the controller itself.
    fn find_controller_by_id(&self, id: &ComponentId) -> Option<&dyn ViewController>;

    /// Presentation options set on this controller.
    ///
    /// These are merged over the presenter's defaults for each transition.
    fn options(&self) -> Options {
        Options::default()
    }

    /// Whether `id` lives anywhere in this controller's subtree.
    fn contains(&self, id: &ComponentId) -> bool {
        self.find_controller_by_id(id).is_some()
    }
}

impl fmt::Debug for dyn ViewController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewController")
            .field("id", self.id())
            .field("name", &self.name())
            .finish()
    }
}
