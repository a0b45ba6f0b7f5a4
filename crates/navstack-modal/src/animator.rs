#![forbid(unsafe_code)]

//! Show and hide transitions against a mounted container.
//!
//! The animator is driven by the host's frame loop through [`tick`]. It
//! holds nothing but the transitions currently in flight; once one settles
//! its completion runs and the entry is gone.
//!
//! # Invariants
//!
//! - Every completion runs exactly once: when its transition settles, when
//!   a newer transition for the same controller supersedes it, or when the
//!   transition is cancelled.
//! - Disabled and zero-duration transitions complete synchronously, inside
//!   [`show`] or [`hide`].
//! - Completions run after the in-flight list is released, so they may start
//!   new transitions.
//! - A controller covered by an entrance is unmounted exactly once: when
//!   that entrance finishes, or when it is cancelled and no entrance above
//!   takes it over.
//!
//! [`tick`]: PresentationAnimator::tick
//! [`show`]: PresentationAnimator::show
//! [`hide`]: PresentationAnimator::hide

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use navstack_core::{ComponentId, ControllerRef, ModalHost, Placement, ResolvedTransition};

use crate::animation::{TransitionPhase, TransitionState};

/// How a transition ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The transition ran to the end.
    Finished,
    /// A newer transition for the same controller replaced it.
    Superseded,
    /// The controller was dismissed before the transition ended.
    Cancelled,
}

/// Callback run when a transition settles.
pub type Completion = Box<dyn FnOnce(Settlement)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Show,
    Hide,
}

struct InFlight {
    id: ComponentId,
    direction: Direction,
    covered: Option<ComponentId>,
    state: TransitionState,
    transition: ResolvedTransition,
    host: Rc<dyn ModalHost>,
    on_complete: Completion,
}

impl InFlight {
    fn finish(self) {
        tracing::trace!(id = %self.id, direction = ?self.direction, "transition finished");
        match self.direction {
            Direction::Show => {
                if let Some(covered) = &self.covered {
                    self.host.detach(covered);
                }
            }
            Direction::Hide => self.host.detach(&self.id),
        }
        (self.on_complete)(Settlement::Finished);
    }
}

/// Runs modal transitions, one per controller at a time.
#[derive(Default)]
pub struct PresentationAnimator {
    in_flight: RefCell<Vec<InFlight>>,
}

impl fmt::Debug for PresentationAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<_> = self
            .in_flight
            .borrow()
            .iter()
            .map(|entry| entry.id.clone())
            .collect();
        f.debug_struct("PresentationAnimator")
            .field("in_flight", &ids)
            .finish()
    }
}

impl PresentationAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `controller` in front and animate it in. Once the entrance
    /// finishes, `covered` is unmounted.
    pub fn show(
        &self,
        controller: &ControllerRef,
        covered: Option<&ControllerRef>,
        host: &Rc<dyn ModalHost>,
        transition: ResolvedTransition,
        on_complete: impl FnOnce(Settlement) + 'static,
    ) {
        self.keep_mounted(controller.id());
        host.attach(controller, Placement::Front);
        self.start(
            controller.id(),
            Direction::Show,
            covered.map(|c| c.id().clone()),
            host,
            transition,
            Box::new(on_complete),
        );
    }

    /// Mount `controller` beneath whatever is showing, with no transition.
    pub fn reveal(&self, controller: &ControllerRef, host: &Rc<dyn ModalHost>) {
        self.keep_mounted(controller.id());
        host.attach(controller, Placement::Behind);
    }

    /// Animate `controller` out, then unmount it.
    pub fn hide(
        &self,
        controller: &ControllerRef,
        host: &Rc<dyn ModalHost>,
        transition: ResolvedTransition,
        on_complete: impl FnOnce(Settlement) + 'static,
    ) {
        self.start(
            controller.id(),
            Direction::Hide,
            None,
            host,
            transition,
            Box::new(on_complete),
        );
    }

    fn start(
        &self,
        id: &ComponentId,
        direction: Direction,
        covered: Option<ComponentId>,
        host: &Rc<dyn ModalHost>,
        transition: ResolvedTransition,
        on_complete: Completion,
    ) {
        let superseded = self.take(id);
        let mut state = match (&superseded, direction) {
            (Some(previous), _) => previous.state.clone(),
            (None, Direction::Show) => TransitionState::new(),
            (None, Direction::Hide) => TransitionState::open(),
        };
        match direction {
            Direction::Show => state.start_opening(),
            Direction::Hide => state.start_closing(),
        }
        tracing::debug!(
            %id,
            ?direction,
            animated = transition.is_animated(),
            duration_ms = u64::try_from(transition.duration.as_millis()).unwrap_or(u64::MAX),
            "transition started"
        );

        let entry = InFlight {
            id: id.clone(),
            direction,
            covered,
            state,
            transition,
            host: Rc::clone(host),
            on_complete,
        };

        if let Some(previous) = superseded {
            tracing::debug!(%id, "superseding transition in flight");
            (previous.on_complete)(Settlement::Superseded);
        }

        if transition.is_animated() {
            self.in_flight.borrow_mut().push(entry);
        } else {
            entry.finish();
        }
    }

    /// Drop the controller's in-flight transition without finishing it.
    ///
    /// The completion runs with [`Settlement::Cancelled`]. A cancelled
    /// entrance passes the controller it was covering to the entrance
    /// in flight above it; with none above, that controller is unmounted
    /// at once. Returns whether anything was in flight.
    pub fn cancel(&self, id: &ComponentId) -> bool {
        let Some(entry) = self.take(id) else {
            return false;
        };
        tracing::debug!(%id, direction = ?entry.direction, "transition cancelled");
        if let Some(covered) = &entry.covered {
            if !self.hand_over(id, covered) {
                entry.host.detach(covered);
            }
        }
        (entry.on_complete)(Settlement::Cancelled);
        true
    }

    // Whichever entrance covers `from` now covers `to` instead.
    fn hand_over(&self, from: &ComponentId, to: &ComponentId) -> bool {
        let mut in_flight = self.in_flight.borrow_mut();
        match in_flight
            .iter_mut()
            .find(|entry| entry.covered.as_ref() == Some(from))
        {
            Some(entry) => {
                tracing::trace!(id = %entry.id, covered = %to, "covered controller handed over");
                entry.covered = Some(to.clone());
                true
            }
            None => false,
        }
    }

    // A controller mounted again must not be unmounted by an entrance that
    // covered it earlier.
    fn keep_mounted(&self, id: &ComponentId) {
        for entry in self.in_flight.borrow_mut().iter_mut() {
            if entry.covered.as_ref() == Some(id) {
                entry.covered = None;
            }
        }
    }

    fn take(&self, id: &ComponentId) -> Option<InFlight> {
        let mut in_flight = self.in_flight.borrow_mut();
        let index = in_flight.iter().position(|entry| entry.id == *id)?;
        Some(in_flight.remove(index))
    }

    /// Advance every transition by `delta`, running completions of those
    /// that settle. Returns how many settled.
    pub fn tick(&self, delta: Duration) -> usize {
        let settled = {
            let mut in_flight = self.in_flight.borrow_mut();
            let mut settled = Vec::new();
            let mut index = 0;
            while index < in_flight.len() {
                let entry = &mut in_flight[index];
                if entry.state.tick(delta, &entry.transition) {
                    settled.push(in_flight.remove(index));
                } else {
                    index += 1;
                }
            }
            settled
        };

        let count = settled.len();
        for entry in settled {
            entry.finish();
        }
        count
    }

    /// Jump every transition to its end, including any started by the
    /// completions that run along the way.
    pub fn finish_all(&self) -> usize {
        let mut count = 0;
        loop {
            let pending = std::mem::take(&mut *self.in_flight.borrow_mut());
            if pending.is_empty() {
                return count;
            }
            count += pending.len();
            for entry in pending {
                entry.finish();
            }
        }
    }

    /// Whether any transition is in flight.
    pub fn is_animating(&self) -> bool {
        !self.in_flight.borrow().is_empty()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.borrow().len()
    }

    /// Phase of the controller's in-flight transition, if it has one.
    pub fn phase(&self, id: &ComponentId) -> Option<TransitionPhase> {
        self.in_flight
            .borrow()
            .iter()
            .find(|entry| entry.id == *id)
            .map(|entry| entry.state.phase())
    }

    /// Eased progress of the controller's in-flight transition.
    pub fn progress(&self, id: &ComponentId) -> Option<f64> {
        self.in_flight
            .borrow()
            .iter()
            .find(|entry| entry.id == *id)
            .map(|entry| entry.state.eased_progress(&entry.transition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navstack_core::Easing;
    use navstack_harness::{RecordingHost, StubController};
    use std::cell::Cell;

    fn linear(ms: u64) -> ResolvedTransition {
        ResolvedTransition {
            enabled: true,
            duration: Duration::from_millis(ms),
            easing: Easing::Linear,
        }
    }

    fn counter() -> (Rc<RefCell<Vec<Settlement>>>, impl FnOnce(Settlement) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |s| sink.borrow_mut().push(s))
    }

    #[test]
    fn show_mounts_immediately_and_completes_after_duration() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let modal = StubController::new("m").handle();
        let (seen, done) = counter();

        animator.show(&modal, None, &host.as_host(), linear(100), done);
        assert!(host.is_mounted("m"));
        assert_eq!(animator.phase(modal.id()), Some(TransitionPhase::Opening));
        assert!(seen.borrow().is_empty());

        assert_eq!(animator.tick(Duration::from_millis(60)), 0);
        assert!(seen.borrow().is_empty());
        assert_eq!(animator.tick(Duration::from_millis(60)), 1);
        assert_eq!(*seen.borrow(), vec![Settlement::Finished]);
        assert!(!animator.is_animating());
    }

    #[test]
    fn hide_unmounts_only_when_settled() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let modal = StubController::new("m").handle();
        host.mount(&modal);
        let (seen, done) = counter();

        animator.hide(&modal, &host.as_host(), linear(100), done);
        assert_eq!(animator.phase(modal.id()), Some(TransitionPhase::Closing));
        animator.tick(Duration::from_millis(50));
        assert!(host.is_mounted("m"));

        animator.tick(Duration::from_millis(50));
        assert!(!host.is_mounted("m"));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn instant_transition_completes_synchronously() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let modal = StubController::new("m").handle();
        let (seen, done) = counter();

        animator.show(&modal, None, &host.as_host(), ResolvedTransition::INSTANT, done);
        assert_eq!(*seen.borrow(), vec![Settlement::Finished]);
        assert!(!animator.is_animating());
    }

    #[test]
    fn newer_transition_supersedes_and_reverses() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let modal = StubController::new("m").handle();
        let (shown, on_shown) = counter();
        let (hidden, on_hidden) = counter();

        animator.show(&modal, None, &host.as_host(), linear(100), on_shown);
        animator.tick(Duration::from_millis(30));
        animator.hide(&modal, &host.as_host(), linear(100), on_hidden);

        assert_eq!(*shown.borrow(), vec![Settlement::Superseded]);
        assert_eq!(animator.in_flight_count(), 1);
        assert_eq!(animator.phase(modal.id()), Some(TransitionPhase::Closing));
        let progress = animator.progress(modal.id()).unwrap();
        assert!((progress - 0.7).abs() < 1e-9);

        animator.tick(Duration::from_millis(40));
        assert_eq!(*hidden.borrow(), vec![Settlement::Finished]);
    }

    #[test]
    fn show_unmounts_covered_when_settled() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let below = StubController::new("below").handle();
        let modal = StubController::new("m").handle();
        host.mount(&below);
        let (_, done) = counter();

        animator.show(&modal, Some(&below), &host.as_host(), linear(100), done);
        assert!(host.is_mounted("below"));
        animator.finish_all();
        assert_eq!(host.mounted(), vec![ComponentId::new("m")]);
    }

    #[test]
    fn remounted_controller_survives_earlier_entrance() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let below = StubController::new("below").handle();
        let modal = StubController::new("m").handle();
        host.mount(&below);
        let (_, done) = counter();

        animator.show(&modal, Some(&below), &host.as_host(), linear(100), done);
        animator.reveal(&below, &host.as_host());
        animator.finish_all();
        assert!(host.is_mounted("below"));
        assert_eq!(host.visible(), Some(ComponentId::new("m")));
    }

    #[test]
    fn cancel_runs_completion_without_touching_host() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let modal = StubController::new("m").handle();
        let (seen, done) = counter();

        animator.show(&modal, None, &host.as_host(), linear(100), done);
        let ops = host.ops().len();
        assert!(animator.cancel(modal.id()));
        assert!(!animator.cancel(modal.id()));

        assert_eq!(*seen.borrow(), vec![Settlement::Cancelled]);
        assert_eq!(host.ops().len(), ops);
        assert!(!animator.is_animating());
    }

    #[test]
    fn cancelled_entrance_hands_covered_to_entrance_above() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let root = StubController::new("root").handle();
        let lower = StubController::new("lower").handle();
        let upper = StubController::new("upper").handle();
        host.mount(&root);
        let (cancelled, on_lower) = counter();
        let (_, on_upper) = counter();

        animator.show(&lower, Some(&root), &host.as_host(), linear(100), on_lower);
        animator.show(&upper, Some(&lower), &host.as_host(), linear(100), on_upper);
        assert!(animator.cancel(lower.id()));
        host.detach(lower.id());

        assert_eq!(*cancelled.borrow(), vec![Settlement::Cancelled]);
        assert!(host.is_mounted("root"));
        animator.finish_all();
        assert_eq!(host.mounted(), vec![ComponentId::new("upper")]);
    }

    #[test]
    fn cancelled_entrance_unmounts_covered_when_nothing_above() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let first = StubController::new("first").handle();
        let second = StubController::new("second").handle();
        let third = StubController::new("third").handle();
        let (_, a) = counter();
        let (_, b) = counter();
        let (_, c) = counter();

        animator.show(&first, None, &host.as_host(), linear(100), a);
        animator.show(&second, Some(&first), &host.as_host(), linear(200), b);
        animator.show(&third, Some(&second), &host.as_host(), linear(100), c);
        animator.tick(Duration::from_millis(100));
        assert!(host.is_mounted("first"));
        assert!(!host.is_mounted("second"));

        assert!(animator.cancel(second.id()));
        assert_eq!(host.mounted(), vec![ComponentId::new("third")]);
        assert!(!animator.is_animating());
    }

    #[test]
    fn repeated_shows_of_same_controller() {
        let animator = PresentationAnimator::new();
        let host = RecordingHost::new();
        let modal = StubController::new("m").handle();
        let calls = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let calls = Rc::clone(&calls);
            animator.show(&modal, None, &host.as_host(), linear(10), move |_| {
                calls.set(calls.get() + 1)
            });
            animator.tick(Duration::from_millis(10));
            let (_, done) = counter();
            animator.hide(&modal, &host.as_host(), linear(10), done);
            animator.tick(Duration::from_millis(10));
        }
        assert_eq!(calls.get(), 3);
        assert!(!host.is_mounted("m"));
    }

    #[test]
    fn completion_may_start_another_transition() {
        let animator = Rc::new(PresentationAnimator::new());
        let host = RecordingHost::new();
        let first = StubController::new("first").handle();
        let second = StubController::new("second").handle();
        let (seen, done) = counter();

        let chained = Rc::clone(&animator);
        let chained_host = host.as_host();
        animator.show(&first, None, &host.as_host(), linear(10), move |_| {
            chained.show(&second, None, &chained_host, linear(10), done);
        });

        assert_eq!(animator.finish_all(), 2);
        assert_eq!(*seen.borrow(), vec![Settlement::Finished]);
        assert_eq!(host.visible(), Some(ComponentId::new("second")));
    }
}
