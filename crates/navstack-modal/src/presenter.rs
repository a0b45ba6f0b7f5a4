#![forbid(unsafe_code)]

//! One show or dismiss at a time.
//!
//! [`ModalPresenter`] wires a single transition together: the animator
//! moves views, the completion destroys what has to go, the listener hears
//! the result and the emitter tells the embedding runtime. It keeps no
//! state between operations beyond its configuration.

use std::fmt;
use std::rc::Rc;

use navstack_core::{CommandListener, ControllerRef, EventEmitter, ModalHost, NavError, Options};

use crate::animator::PresentationAnimator;

/// Runs modal transitions for the stack.
pub struct ModalPresenter {
    animator: Rc<PresentationAnimator>,
    host: Option<Rc<dyn ModalHost>>,
    default_options: Options,
    emitter: Option<EventEmitter>,
}

impl fmt::Debug for ModalPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalPresenter")
            .field("animator", &self.animator)
            .field("has_host", &self.host.is_some())
            .field("default_options", &self.default_options)
            .field("emitter", &self.emitter)
            .finish()
    }
}

impl Default for ModalPresenter {
    fn default() -> Self {
        Self::new(Rc::new(PresentationAnimator::new()))
    }
}

impl ModalPresenter {
    /// Create a presenter driving `animator`.
    pub fn new(animator: Rc<PresentationAnimator>) -> Self {
        Self {
            animator,
            host: None,
            default_options: Options::default(),
            emitter: None,
        }
    }

    /// Set the container modals are mounted into.
    pub fn set_content_layout(&mut self, host: Rc<dyn ModalHost>) {
        self.host = Some(host);
    }

    /// Set the options every controller's own options are layered over.
    pub fn set_default_options(&mut self, options: Options) {
        self.default_options = options;
    }

    pub fn set_event_emitter(&mut self, emitter: EventEmitter) {
        self.emitter = Some(emitter);
    }

    pub fn animator(&self) -> &Rc<PresentationAnimator> {
        &self.animator
    }

    pub fn default_options(&self) -> &Options {
        &self.default_options
    }

    fn resolve(&self, controller: &ControllerRef) -> Options {
        controller.options().merged_over(&self.default_options)
    }

    /// Animate `incoming` in; once it has settled, unmount `outgoing`.
    ///
    /// `outgoing` is hidden, never destroyed. If the entrance is superseded,
    /// `outgoing` stays mounted. The listener succeeds with the incoming id
    /// and a `CommandCompleted` event follows.
    pub fn show_modal(
        &self,
        incoming: &ControllerRef,
        outgoing: Option<&ControllerRef>,
        listener: CommandListener,
    ) {
        let Some(host) = self.host.as_ref() else {
            listener.on_error(NavError::NoContentLayout);
            return;
        };

        let transition = self.resolve(incoming).show_modal_transition();
        let id = incoming.id().clone();
        let emitter = self.emitter.clone();

        self.animator
            .show(incoming, outgoing, host, transition, move |settlement| {
                tracing::trace!(%id, ?settlement, "show settled");
                listener.on_success(&id);
                if let Some(emitter) = emitter {
                    emitter.command_completed(id.as_str());
                }
            });
    }

    /// Mount `incoming` beneath `outgoing`, animate `outgoing` away and
    /// destroy it once gone.
    pub fn dismiss_top_modal(
        &self,
        outgoing: &ControllerRef,
        incoming: Option<&ControllerRef>,
        listener: CommandListener,
    ) {
        let Some(host) = self.host.as_ref() else {
            outgoing.destroy();
            listener.on_error(NavError::NoContentLayout);
            return;
        };

        if let Some(incoming) = incoming {
            self.animator.reveal(incoming, host);
        }

        let transition = self.resolve(outgoing).dismiss_modal_transition();
        let dismissed = Rc::clone(outgoing);
        let emitter = self.emitter.clone();

        self.animator.hide(outgoing, host, transition, move |_| {
            let id = dismissed.id().clone();
            dismissed.destroy();
            if let Some(emitter) = emitter {
                emitter.modal_dismissed(&id);
            }
            listener.on_success(&id);
        });
    }

    /// Destroy a modal that is not on screen. No animation; the listener
    /// succeeds before this returns.
    pub fn dismiss_modal(&self, outgoing: &ControllerRef, listener: CommandListener) {
        self.discard_modal(outgoing);
        let id = outgoing.id();
        if let Some(emitter) = &self.emitter {
            emitter.modal_dismissed(id);
        }
        listener.on_success(id);
    }

    /// Unmount and destroy `outgoing` with no event and no listener.
    ///
    /// An entrance still in flight is cancelled; what it was covering goes
    /// to the entrance above it, or is unmounted when there is none.
    pub fn discard_modal(&self, outgoing: &ControllerRef) {
        let id = outgoing.id();
        self.animator.cancel(id);
        if let Some(host) = &self.host {
            host.detach(id);
        }
        outgoing.destroy();
    }
}
