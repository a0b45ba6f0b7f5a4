#![forbid(unsafe_code)]

//! Modal presentation for navstack.
//!
//! - [`ModalStack`] tracks presented modals over a caller-supplied root and
//!   turns show, dismiss and back commands into transitions
//! - [`ModalPresenter`] runs one transition and completes its listener
//! - [`PresentationAnimator`] drives show and hide transitions from the
//!   host's frame loop
//!
//! Transitions advance only when the embedder calls
//! [`PresentationAnimator::tick`]; with animations disabled every command
//! completes before it returns.

pub mod animation;
pub mod animator;
pub mod presenter;
pub mod stack;

pub use animation::{TransitionPhase, TransitionState};
pub use animator::{Completion, PresentationAnimator, Settlement};
pub use presenter::ModalPresenter;
pub use stack::ModalStack;
