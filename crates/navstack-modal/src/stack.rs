#![forbid(unsafe_code)]

//! The stack of presented modals.
//!
//! `ModalStack` owns the ordered collection of modals shown over a root
//! screen. It decides which controller is covered or revealed by each
//! command, mutates itself, then hands the transition to its
//! [`ModalPresenter`]. The root is never stored; callers pass the current
//! one with every command.
//!
//! # Invariants
//!
//! - Presentation order is preserved: index `size() - 1` is the top.
//! - Only the top modal receives back presses.
//! - No two modals share an id.
//! - The collection is updated before any transition starts, so a command
//!   issued mid-animation sees current contents.
//! - Every command completes its listener exactly once.
//!
//! # Failure Modes
//!
//! - Dismissing an id no modal's subtree contains fails the listener with
//!   [`NavError::NothingToDismiss`] and leaves the stack untouched.
//! - `dismiss_all_modals()` on an empty stack fails the same way.
//! - Showing an id that is already presented fails with
//!   [`NavError::AlreadyPresented`].
//! - `peek()` on an empty stack panics; use [`ModalStack::top`] when the
//!   stack may be empty.
//!
//! # Example
//!
//! ```ignore
//! let mut stack = ModalStack::new();
//! stack.set_content_layout(host);
//!
//! stack.show_modal(settings, &root, CommandListener::noop());
//! stack.animator().tick(frame_delta);
//!
//! // Back closes the top modal, or returns the listener if there is none.
//! if let BackOutcome::Declined(listener) = stack.handle_back(listener, &root) {
//!     root_navigator.handle_back(listener);
//! }
//! ```

use std::rc::Rc;

use navstack_core::{
    BackOutcome, CommandListener, ComponentId, ControllerRef, EventEmitter, ModalHost, NavError,
    Options, ViewController,
};

use crate::animator::PresentationAnimator;
use crate::presenter::ModalPresenter;

/// Ordered collection of presented modals, bottom first.
#[derive(Debug, Default)]
pub struct ModalStack {
    modals: Vec<ControllerRef>,
    presenter: ModalPresenter,
}

impl ModalStack {
    /// Create an empty stack with its own animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack driving transitions through `presenter`.
    pub fn with_presenter(presenter: ModalPresenter) -> Self {
        Self {
            modals: Vec::new(),
            presenter,
        }
    }

    pub fn set_content_layout(&mut self, host: Rc<dyn ModalHost>) {
        self.presenter.set_content_layout(host);
    }

    pub fn set_default_options(&mut self, options: Options) {
        self.presenter.set_default_options(options);
    }

    pub fn set_event_emitter(&mut self, emitter: EventEmitter) {
        self.presenter.set_event_emitter(emitter);
    }

    /// The animator to tick from the host's frame loop.
    pub fn animator(&self) -> &Rc<PresentationAnimator> {
        self.presenter.animator()
    }

    // --- Commands ---

    /// Present `controller` over the current top, or over `root` when the
    /// stack is empty.
    ///
    /// The covered controller is hidden once the entrance finishes; it is
    /// not destroyed. The listener succeeds when the transition completes.
    pub fn show_modal(
        &mut self,
        controller: ControllerRef,
        root: &ControllerRef,
        listener: CommandListener,
    ) {
        let _span = tracing::debug_span!(
            "modal_show",
            id = %controller.id(),
            depth = self.modals.len()
        )
        .entered();

        if self.modals.iter().any(|m| m.id() == controller.id()) {
            tracing::debug!("already presented");
            listener.on_error(NavError::AlreadyPresented(controller.id().clone()));
            return;
        }

        let covered = self.modals.last().cloned().unwrap_or_else(|| Rc::clone(root));
        self.modals.push(Rc::clone(&controller));
        self.presenter
            .show_modal(&controller, Some(&covered), listener);
    }

    /// Dismiss the modal whose subtree contains `id`.
    ///
    /// The top modal animates out and reveals the modal beneath it, or
    /// `root` if it was the last one. A buried modal is destroyed in place
    /// and the top stays as it is.
    pub fn dismiss_modal(
        &mut self,
        id: &ComponentId,
        root: &ControllerRef,
        listener: CommandListener,
    ) {
        let _span =
            tracing::debug_span!("modal_dismiss", %id, depth = self.modals.len()).entered();

        match self.modals.iter().position(|m| m.contains(id)) {
            Some(index) => self.dismiss_at(index, root, listener),
            None => {
                tracing::debug!("nothing to dismiss");
                listener.on_error(NavError::NothingToDismiss);
            }
        }
    }

    /// Dismiss every modal, revealing `root`.
    ///
    /// Only the top modal animates; the rest are destroyed silently. The
    /// listener completes once, when the top's exit finishes.
    pub fn dismiss_all_modals(&mut self, root: &ControllerRef, listener: CommandListener) {
        let _span = tracing::debug_span!("modal_dismiss_all", depth = self.modals.len()).entered();

        if self.modals.is_empty() {
            tracing::debug!("nothing to dismiss");
            listener.on_error(NavError::NothingToDismiss);
            return;
        }

        let buried = self.modals.len() - 1;
        for modal in self.modals.drain(..buried) {
            tracing::trace!(id = %modal.id(), "discarding buried modal");
            self.presenter.discard_modal(&modal);
        }
        self.dismiss_at(0, root, listener);
    }

    /// Route a back press to the top modal.
    ///
    /// Returns [`BackOutcome::Declined`] with the listener untouched when no
    /// modal is presented. Otherwise the top either consumes the press
    /// itself or is dismissed as if by [`dismiss_modal`](Self::dismiss_modal).
    pub fn handle_back(&mut self, listener: CommandListener, root: &ControllerRef) -> BackOutcome {
        let Some(top) = self.modals.last().cloned() else {
            return BackOutcome::Declined(listener);
        };
        let _span = tracing::debug_span!("modal_back", top = %top.id()).entered();

        match top.handle_back(listener) {
            BackOutcome::Consumed => BackOutcome::Consumed,
            BackOutcome::Declined(listener) => {
                let index = self.modals.len() - 1;
                self.dismiss_at(index, root, listener);
                BackOutcome::Consumed
            }
        }
    }

    fn dismiss_at(&mut self, index: usize, root: &ControllerRef, listener: CommandListener) {
        let was_top = index + 1 == self.modals.len();
        let removed = self.modals.remove(index);

        if was_top {
            let revealed = self.modals.last().cloned().unwrap_or_else(|| Rc::clone(root));
            tracing::debug!(id = %removed.id(), revealed = %revealed.id(), "dismissing top");
            self.presenter
                .dismiss_top_modal(&removed, Some(&revealed), listener);
        } else {
            tracing::debug!(id = %removed.id(), index, "dismissing buried modal");
            self.presenter.dismiss_modal(&removed, listener);
        }
    }

    // --- Queries ---

    /// The top modal.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    pub fn peek(&self) -> &ControllerRef {
        match self.modals.last() {
            Some(top) => top,
            None => panic!("peek() called on an empty modal stack"),
        }
    }

    /// The top modal, if any.
    #[inline]
    pub fn top(&self) -> Option<&ControllerRef> {
        self.modals.last()
    }

    /// The modal at `index`, counted from the bottom.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&ControllerRef> {
        self.modals.get(index)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.modals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.modals.is_empty()
    }

    /// Modals bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &ControllerRef> {
        self.modals.iter()
    }

    /// Whether any modal's subtree contains `id`.
    pub fn contains(&self, id: &ComponentId) -> bool {
        self.modals.iter().any(|m| m.contains(id))
    }

    /// Search every modal's subtree, bottom first.
    pub fn find_controller_by_id(&self, id: &ComponentId) -> Option<&dyn ViewController> {
        self.modals
            .iter()
            .find_map(|modal| modal.find_controller_by_id(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navstack_harness::{
        NestedController, RecordingHost, RecordingListener, RecordingSink, StubController,
    };
    use std::time::Duration;
    use tracing_test::traced_test;

    struct Fixture {
        stack: ModalStack,
        host: Rc<RecordingHost>,
        sink: Rc<RecordingSink>,
        root: ControllerRef,
    }

    fn fixture(options: Options) -> Fixture {
        let host = RecordingHost::new();
        let sink = RecordingSink::new();
        let root = StubController::new("root").handle();
        host.mount(&root);

        let mut stack = ModalStack::new();
        stack.set_content_layout(host.as_host());
        stack.set_event_emitter(sink.emitter());
        stack.set_default_options(options);
        Fixture {
            stack,
            host,
            sink,
            root,
        }
    }

    fn instant() -> Fixture {
        fixture(Options::without_animations())
    }

    fn id(s: &str) -> ComponentId {
        ComponentId::new(s)
    }

    #[test]
    fn new_stack_is_empty() {
        let stack = ModalStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.size(), 0);
        assert!(stack.top().is_none());
        assert!(stack.get(0).is_none());
    }

    #[test]
    #[should_panic(expected = "empty modal stack")]
    fn peek_on_empty_panics() {
        let stack = ModalStack::new();
        let _ = stack.peek();
    }

    #[test]
    fn show_pushes_and_hides_root() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let a = StubController::new("a");

        fx.stack.show_modal(a.handle(), &fx.root, results.listener());

        assert_eq!(fx.stack.size(), 1);
        assert_eq!(fx.stack.peek().id(), "a");
        assert_eq!(fx.host.mounted(), vec![id("a")]);
        assert_eq!(results.successes(), vec![id("a")]);
        assert_eq!(fx.sink.completed_commands(), vec!["a".to_owned()]);
    }

    #[test]
    fn show_hides_previous_top_not_root() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let a = StubController::new("a");
        let b = StubController::new("b");

        fx.stack.show_modal(a.handle(), &fx.root, results.listener());
        fx.stack.show_modal(b.handle(), &fx.root, results.listener());

        assert_eq!(fx.host.mounted(), vec![id("b")]);
        assert_eq!(fx.stack.get(0).map(|m| m.id().clone()), Some(id("a")));
        assert_eq!(fx.stack.peek().id(), "b");
        assert!(!a.is_destroyed());
    }

    #[test]
    fn show_rejects_duplicate_id() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let a = StubController::new("a");

        fx.stack.show_modal(a.handle(), &fx.root, results.listener());
        fx.stack.show_modal(a.handle(), &fx.root, results.listener());

        assert_eq!(fx.stack.size(), 1);
        assert_eq!(results.errors(), vec![NavError::AlreadyPresented(id("a"))]);
    }

    #[test]
    fn listener_waits_for_entrance() {
        let mut fx = fixture(Options::default());
        let results = RecordingListener::new();
        let a = StubController::new("a");

        fx.stack.show_modal(a.handle(), &fx.root, results.listener());
        assert_eq!(fx.stack.size(), 1);
        assert_eq!(results.count(), 0);
        assert!(fx.host.is_mounted("root"));

        fx.stack.animator().tick(Duration::from_millis(100));
        assert_eq!(results.count(), 0);
        fx.stack.animator().tick(Duration::from_millis(100));
        assert_eq!(results.successes(), vec![id("a")]);
        assert!(!fx.host.is_mounted("root"));
    }

    #[test]
    fn dismiss_top_reveals_next() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let a = StubController::new("a");
        let b = StubController::new("b");
        fx.stack.show_modal(a.handle(), &fx.root, results.listener());
        fx.stack.show_modal(b.handle(), &fx.root, results.listener());

        fx.stack.dismiss_modal(&id("b"), &fx.root, results.listener());

        assert_eq!(fx.stack.size(), 1);
        assert_eq!(fx.host.visible(), Some(id("a")));
        assert!(b.is_destroyed());
        assert!(!a.is_destroyed());
        assert_eq!(fx.sink.dismissed_ids(), vec![id("b")]);
    }

    #[test]
    fn dismiss_last_reveals_root() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let a = StubController::new("a");
        fx.stack.show_modal(a.handle(), &fx.root, results.listener());

        fx.stack.dismiss_modal(&id("a"), &fx.root, results.listener());

        assert!(fx.stack.is_empty());
        assert_eq!(fx.host.mounted(), vec![id("root")]);
        assert_eq!(results.successes(), vec![id("a"), id("a")]);
    }

    #[test]
    fn dismiss_buried_leaves_top_alone() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let a = StubController::new("a");
        let b = StubController::new("b");
        fx.stack.show_modal(a.handle(), &fx.root, results.listener());
        fx.stack.show_modal(b.handle(), &fx.root, results.listener());
        let ops_before = fx.host.ops().len();

        fx.stack.dismiss_modal(&id("a"), &fx.root, results.listener());

        assert_eq!(fx.stack.size(), 1);
        assert_eq!(fx.stack.peek().id(), "b");
        assert_eq!(fx.host.visible(), Some(id("b")));
        assert!(a.is_destroyed());
        let ops = fx.host.ops();
        assert_eq!(&ops[ops_before..], &[navstack_harness::HostOp::Detach(id("a"))]);
    }

    #[test]
    fn dismiss_resolves_nested_ids() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let inner = StubController::new("inner");
        let nav = NestedController::new("nav", vec![inner.handle()]);
        fx.stack.show_modal(nav.handle(), &fx.root, results.listener());

        fx.stack.dismiss_modal(&id("inner"), &fx.root, results.listener());

        assert!(fx.stack.is_empty());
        assert_eq!(nav.destroy_count(), 1);
        assert!(inner.is_destroyed());
        assert_eq!(results.successes().last(), Some(&id("nav")));
    }

    #[test]
    fn dismiss_unknown_id_fails_without_mutation() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let a = StubController::new("a");
        fx.stack.show_modal(a.handle(), &fx.root, results.listener());

        fx.stack.dismiss_modal(&id("ghost"), &fx.root, results.listener());

        assert_eq!(fx.stack.size(), 1);
        assert_eq!(results.errors(), vec![NavError::NothingToDismiss]);
        assert_eq!(results.errors()[0].to_string(), "Nothing to dismiss");
    }

    #[test]
    fn dismiss_all_destroys_everything_once() {
        let mut fx = instant();
        let shows = RecordingListener::new();
        let modals: Vec<_> = ["a", "b", "c"].iter().map(|s| StubController::new(s)).collect();
        for m in &modals {
            fx.stack.show_modal(m.handle(), &fx.root, shows.listener());
        }

        let results = RecordingListener::new();
        fx.stack.dismiss_all_modals(&fx.root, results.listener());

        assert!(fx.stack.is_empty());
        assert_eq!(results.successes(), vec![id("c")]);
        assert!(modals.iter().all(|m| m.destroy_count() == 1));
        assert_eq!(fx.host.mounted(), vec![id("root")]);
        assert_eq!(fx.sink.dismissed_ids(), vec![id("c")]);
    }

    #[test]
    fn dismiss_all_on_empty_fails() {
        let mut fx = instant();
        let results = RecordingListener::new();
        fx.stack.dismiss_all_modals(&fx.root, results.listener());
        assert_eq!(results.errors(), vec![NavError::NothingToDismiss]);
    }

    #[test]
    fn back_on_empty_declines() {
        let mut fx = instant();
        let results = RecordingListener::new();

        let outcome = fx.stack.handle_back(results.listener(), &fx.root);
        let BackOutcome::Declined(listener) = outcome else {
            panic!("empty stack should decline");
        };
        assert_eq!(results.count(), 0);
        listener.on_success(fx.root.id());
        assert_eq!(results.count(), 1);
    }

    #[test]
    fn back_consumed_by_top_leaves_stack() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let a = StubController::new("a");
        a.set_consumes_back(true);
        fx.stack.show_modal(a.handle(), &fx.root, results.listener());

        let outcome = fx.stack.handle_back(results.listener(), &fx.root);
        assert!(outcome.is_consumed());
        assert_eq!(fx.stack.size(), 1);
        assert!(!a.is_destroyed());
    }

    #[test]
    fn back_dismisses_top() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let a = StubController::new("a");
        let b = StubController::new("b");
        fx.stack.show_modal(a.handle(), &fx.root, results.listener());
        fx.stack.show_modal(b.handle(), &fx.root, results.listener());

        assert!(fx.stack.handle_back(results.listener(), &fx.root).is_consumed());
        assert_eq!(fx.stack.size(), 1);
        assert!(b.is_destroyed());
        assert_eq!(fx.host.visible(), Some(id("a")));
    }

    #[test]
    fn find_controller_searches_subtrees() {
        let mut fx = instant();
        let results = RecordingListener::new();
        let leaf = StubController::new("leaf");
        let nav = NestedController::new("nav", vec![leaf.handle()]);
        fx.stack.show_modal(nav.handle(), &fx.root, results.listener());

        let found = fx.stack.find_controller_by_id(&id("leaf"));
        assert_eq!(found.map(|c| c.id().clone()), Some(id("leaf")));
        assert!(fx.stack.find_controller_by_id(&id("root")).is_none());
        assert!(fx.stack.contains(&id("nav")));
        assert_eq!(fx.stack.iter().count(), 1);
    }

    #[test]
    #[traced_test]
    fn unknown_dismiss_is_logged() {
        let mut fx = instant();
        let results = RecordingListener::new();
        fx.stack.dismiss_modal(&id("ghost"), &fx.root, results.listener());
        assert!(logs_contain("nothing to dismiss"));
    }
}
