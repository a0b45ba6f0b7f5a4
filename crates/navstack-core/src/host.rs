#![forbid(unsafe_code)]

//! The container modals are mounted into.

use crate::controller::{ComponentId, ControllerRef};

/// Where an attached controller goes relative to what is already mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Above everything; the usual place for an incoming modal.
    #[default]
    Front,
    /// Beneath everything; used to reveal a screen under a departing modal.
    Behind,
}

/// A mounted view container.
///
/// Attaching a controller that is already mounted moves it to `placement`.
/// Detaching an id that is not mounted does nothing.
pub trait ModalHost {
    fn attach(&self, controller: &ControllerRef, placement: Placement);

    fn detach(&self, id: &ComponentId);
}
