#![forbid(unsafe_code)]

//! Core contracts for navstack.
//!
//! This crate provides the pieces every navigation component talks through:
//! - [`ViewController`] and [`ComponentId`] for presentable screens and their subtrees
//! - [`CommandListener`] for the one-shot result of a navigation command
//! - [`EventEmitter`] and [`NavigationEvent`] for notifications to the embedding runtime
//! - [`Options`] for presentation defaults parsed from JSON
//! - [`ModalHost`] for the container modals are mounted into
//!
//! Everything here is single-threaded: handles are `Rc`, nothing is `Send`.

pub mod controller;
pub mod error;
pub mod events;
pub mod host;
pub mod listener;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod options;

pub use controller::{BackOutcome, ComponentId, ControllerRef, ViewController};
pub use error::{EmitError, NavError};
pub use events::{EventEmitter, EventSink, NavigationEvent};
pub use host::{ModalHost, Placement};
pub use listener::{CommandListener, CommandResult};
pub use options::{AnimationOptions, Easing, Options, ResolvedTransition, TransitionOptions};
