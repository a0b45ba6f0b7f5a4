#![forbid(unsafe_code)]

//! Test harness for navstack.
//!
//! Recording doubles for every collaborator of the modal stack:
//!
//! - [`StubController`]: a leaf screen with configurable back handling that
//!   counts `destroy()` calls
//! - [`NestedController`]: a navigator with its own child stack, for subtree
//!   lookup and self-consumed back presses
//! - [`RecordingListener`]: hands out [`CommandListener`]s and records results
//! - [`RecordingSink`]: an [`EventSink`] that keeps every event
//! - [`RecordingHost`]: a [`ModalHost`] that tracks what is mounted, front last

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use navstack_core::{
    BackOutcome, CommandListener, CommandResult, ComponentId, ControllerRef, EmitError,
    EventEmitter, EventSink, ModalHost, NavError, NavigationEvent, Options, Placement,
    ViewController,
};

// ============================================================================
// Controllers
// ============================================================================

/// A leaf screen.
#[derive(Debug)]
pub struct StubController {
    id: ComponentId,
    name: String,
    consumes_back: Cell<bool>,
    destroyed: Cell<u32>,
    options: RefCell<Options>,
}

impl StubController {
    pub fn new(id: &str) -> Rc<Self> {
        Self::named(id, "Stub")
    }

    pub fn named(id: &str, name: &str) -> Rc<Self> {
        Rc::new(Self {
            id: ComponentId::new(id),
            name: name.to_owned(),
            consumes_back: Cell::new(false),
            destroyed: Cell::new(0),
            options: RefCell::new(Options::default()),
        })
    }

    /// A shared handle usable wherever a [`ControllerRef`] is expected.
    pub fn handle(self: &Rc<Self>) -> ControllerRef {
        Rc::clone(self) as ControllerRef
    }

    /// Make back presses succeed inside the controller.
    pub fn set_consumes_back(&self, consumes: bool) {
        self.consumes_back.set(consumes);
    }

    pub fn set_options(&self, options: Options) {
        *self.options.borrow_mut() = options;
    }

    pub fn destroy_count(&self) -> u32 {
        self.destroyed.get()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get() > 0
    }
}

impl ViewController for StubController {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn handle_back(&self, listener: CommandListener) -> BackOutcome {
        if self.consumes_back.get() {
            listener.on_success(&self.id);
            BackOutcome::Consumed
        } else {
            BackOutcome::Declined(listener)
        }
    }

    fn destroy(&self) {
        self.destroyed.set(self.destroyed.get() + 1);
    }

    fn find_controller_by_id(&self, id: &ComponentId) -> Option<&dyn ViewController> {
        (self.id == *id).then_some(self as &dyn ViewController)
    }

    fn options(&self) -> Options {
        self.options.borrow().clone()
    }
}

/// A navigator owning a stack of child controllers.
///
/// A back press pops the top child while more than one remains; with a
/// single child it declines so the enclosing modal can be dismissed.
#[derive(Debug)]
pub struct NestedController {
    id: ComponentId,
    children: Vec<ControllerRef>,
    depth: Cell<usize>,
    destroyed: Cell<u32>,
}

impl NestedController {
    pub fn new(id: &str, children: Vec<ControllerRef>) -> Rc<Self> {
        let depth = Cell::new(children.len());
        Rc::new(Self {
            id: ComponentId::new(id),
            children,
            depth,
            destroyed: Cell::new(0),
        })
    }

    pub fn handle(self: &Rc<Self>) -> ControllerRef {
        Rc::clone(self) as ControllerRef
    }

    /// Children still on the navigator's own stack.
    pub fn child_count(&self) -> usize {
        self.depth.get()
    }

    pub fn destroy_count(&self) -> u32 {
        self.destroyed.get()
    }

    fn live_children(&self) -> &[ControllerRef] {
        &self.children[..self.depth.get()]
    }
}

impl ViewController for NestedController {
    fn id(&self) -> &ComponentId {
        &self.id
    }

    fn name(&self) -> &str {
        "Nested"
    }

    fn handle_back(&self, listener: CommandListener) -> BackOutcome {
        let depth = self.depth.get();
        if depth <= 1 {
            return BackOutcome::Declined(listener);
        }
        self.depth.set(depth - 1);
        let popped = &self.children[depth - 1];
        popped.destroy();
        listener.on_success(popped.id());
        BackOutcome::Consumed
    }

    fn destroy(&self) {
        self.destroyed.set(self.destroyed.get() + 1);
        for child in self.live_children() {
            child.destroy();
        }
    }

    fn find_controller_by_id(&self, id: &ComponentId) -> Option<&dyn ViewController> {
        if self.id == *id {
            return Some(self as &dyn ViewController);
        }
        self.live_children()
            .iter()
            .find_map(|child| child.find_controller_by_id(id))
    }
}

// ============================================================================
// Listener
// ============================================================================

/// Records every result delivered to the listeners it hands out.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    results: Rc<RefCell<Vec<CommandResult>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh one-shot listener feeding this recorder.
    pub fn listener(&self) -> CommandListener {
        let results = Rc::clone(&self.results);
        CommandListener::new(move |result| results.borrow_mut().push(result))
    }

    pub fn results(&self) -> Vec<CommandResult> {
        self.results.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.results.borrow().len()
    }

    pub fn successes(&self) -> Vec<ComponentId> {
        self.results
            .borrow()
            .iter()
            .filter_map(|r| r.as_ref().ok().cloned())
            .collect()
    }

    pub fn errors(&self) -> Vec<NavError> {
        self.results
            .borrow()
            .iter()
            .filter_map(|r| r.as_ref().err().cloned())
            .collect()
    }
}

// ============================================================================
// Event sink
// ============================================================================

/// Keeps every event; can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: RefCell<Vec<NavigationEvent>>,
    failing: Cell<bool>,
}

impl RecordingSink {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// An emitter delivering into this sink.
    pub fn emitter(self: &Rc<Self>) -> EventEmitter {
        EventEmitter::new(Rc::clone(self) as Rc<dyn EventSink>)
    }

    /// Reject every event from now on.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.borrow().clone()
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.name() == name)
            .count()
    }

    /// Ids carried by `ModalDismissed` events, in emission order.
    pub fn dismissed_ids(&self) -> Vec<ComponentId> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                NavigationEvent::ModalDismissed { component_id } => Some(component_id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Command ids carried by `CommandCompleted` events, in emission order.
    pub fn completed_commands(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                NavigationEvent::CommandCompleted { command_id, .. } => Some(command_id.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn send(&self, event: &NavigationEvent) -> Result<(), EmitError> {
        if self.failing.get() {
            return Err(EmitError("recording sink set to fail".into()));
        }
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

// ============================================================================
// Host
// ============================================================================

/// Tracks mounted controllers bottom to top.
#[derive(Debug, Default)]
pub struct RecordingHost {
    mounted: RefCell<Vec<ComponentId>>,
    log: RefCell<Vec<HostOp>>,
}

/// One call made against a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
    Attach(ComponentId, Placement),
    Detach(ComponentId),
}

impl RecordingHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn as_host(self: &Rc<Self>) -> Rc<dyn ModalHost> {
        Rc::clone(self) as Rc<dyn ModalHost>
    }

    /// Mount `controller` directly, as the embedder does for the root.
    pub fn mount(&self, controller: &ControllerRef) {
        self.attach(controller, Placement::Front);
    }

    /// The front-most mounted id: what the user sees.
    pub fn visible(&self) -> Option<ComponentId> {
        self.mounted.borrow().last().cloned()
    }

    pub fn mounted(&self) -> Vec<ComponentId> {
        self.mounted.borrow().clone()
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.mounted.borrow().iter().any(|m| m == id)
    }

    pub fn ops(&self) -> Vec<HostOp> {
        self.log.borrow().clone()
    }
}

impl ModalHost for RecordingHost {
    fn attach(&self, controller: &ControllerRef, placement: Placement) {
        let id = controller.id().clone();
        tracing::trace!(%id, ?placement, "host attach");
        let mut mounted = self.mounted.borrow_mut();
        mounted.retain(|m| *m != id);
        match placement {
            Placement::Front => mounted.push(id.clone()),
            Placement::Behind => mounted.insert(0, id.clone()),
        }
        self.log.borrow_mut().push(HostOp::Attach(id, placement));
    }

    fn detach(&self, id: &ComponentId) {
        tracing::trace!(%id, "host detach");
        self.mounted.borrow_mut().retain(|m| m != id);
        self.log.borrow_mut().push(HostOp::Detach(id.clone()));
    }
}
