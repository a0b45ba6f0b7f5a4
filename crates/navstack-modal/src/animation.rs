#![forbid(unsafe_code)]

//! Per-controller transition state.
//!
//! [`TransitionState`] tracks one controller's progress through an entrance
//! or exit. It knows nothing about views; the animator owns the states and
//! decides what to do when one finishes.
//!
//! # Invariants
//!
//! - Progress is always in `[0.0, 1.0]`.
//! - Reversing mid-flight keeps momentum: 30% into an entrance becomes 70%
//!   into the exit.
//! - A disabled or zero-duration transition completes on the first tick.
//!
//! # Failure Modes
//!
//! - Ticking a settled state (`Open` or `Closed`) is a no-op.

use std::time::Duration;

use navstack_core::ResolvedTransition;

/// Where a controller's view is in its show or hide transition.
///
/// An entrance runs from `Closed` through `Opening` to `Open` and an exit
/// runs back through `Closing`. A new request in the middle of a transition
/// turns `Opening` into `Closing` (or the reverse) without settling first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    /// Not on screen.
    #[default]
    Closed,
    /// Animating in.
    Opening,
    /// Fully on screen.
    Open,
    /// Animating out.
    Closing,
}

impl TransitionPhase {
    /// Whether a transition is in progress.
    #[inline]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

/// Progress of one controller through its current transition.
#[derive(Debug, Clone, Default)]
pub struct TransitionState {
    phase: TransitionPhase,
    progress: f64,
}

impl TransitionState {
    /// A closed state, for a controller that has never been shown.
    pub fn new() -> Self {
        Self::default()
    }

    /// A state that is already fully open.
    pub fn open() -> Self {
        Self {
            phase: TransitionPhase::Open,
            progress: 1.0,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Raw linear progress within the current phase.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Begin an entrance.
    ///
    /// No-op when already opening or open; reverses an exit in flight.
    pub fn start_opening(&mut self) {
        match self.phase {
            TransitionPhase::Closed => {
                self.phase = TransitionPhase::Opening;
                self.progress = 0.0;
            }
            TransitionPhase::Closing => {
                self.phase = TransitionPhase::Opening;
                self.progress = 1.0 - self.progress;
            }
            TransitionPhase::Opening | TransitionPhase::Open => {}
        }
    }

    /// Begin an exit.
    ///
    /// No-op when already closing or closed; reverses an entrance in flight.
    pub fn start_closing(&mut self) {
        match self.phase {
            TransitionPhase::Open => {
                self.phase = TransitionPhase::Closing;
                self.progress = 0.0;
            }
            TransitionPhase::Opening => {
                self.phase = TransitionPhase::Closing;
                self.progress = 1.0 - self.progress;
            }
            TransitionPhase::Closing | TransitionPhase::Closed => {}
        }
    }

    /// Advance by `delta`.
    ///
    /// Returns `true` when this tick settled the transition (Opening → Open
    /// or Closing → Closed).
    pub fn tick(&mut self, delta: Duration, transition: &ResolvedTransition) -> bool {
        if !self.phase.is_animating() {
            return false;
        }

        if transition.is_animated() {
            self.progress += delta.as_secs_f64() / transition.duration.as_secs_f64();
            self.progress = self.progress.min(1.0);
        } else {
            self.progress = 1.0;
        }

        if self.progress < 1.0 {
            return false;
        }

        match self.phase {
            TransitionPhase::Opening => {
                self.phase = TransitionPhase::Open;
                self.progress = 1.0;
            }
            TransitionPhase::Closing => {
                self.phase = TransitionPhase::Closed;
                self.progress = 0.0;
            }
            TransitionPhase::Open | TransitionPhase::Closed => {}
        }
        true
    }

    /// Progress mapped through the transition's easing curve.
    ///
    /// `1.0` means fully in for an entrance and fully out for an exit.
    pub fn eased_progress(&self, transition: &ResolvedTransition) -> f64 {
        match self.phase {
            TransitionPhase::Opening | TransitionPhase::Closing => {
                transition.easing.apply(self.progress)
            }
            TransitionPhase::Open => 1.0,
            TransitionPhase::Closed => 0.0,
        }
    }
}
