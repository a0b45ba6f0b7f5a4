#![forbid(unsafe_code)]

//! Notifications sent to the embedding runtime.
//!
//! [`EventEmitter`] is the typed front end; an [`EventSink`] does the actual
//! delivery (a JS bridge in production, a recorder in tests). Emission is
//! fire-and-forget: a sink failure is logged and never reaches the caller
//! of a navigation command.
//!
//! # Wire format
//!
//! | Event | Name | Payload keys |
//! |-------|------|--------------|
//! | App launched | `RNN.AppLaunched` | none |
//! | Command completed | `RNN.CommandCompleted` | `commandId`, `completionTime` |
//! | Component appeared | `RNN.ComponentDidAppear` | `componentId`, `componentName` |
//! | Component disappeared | `RNN.ComponentDidDisappear` | `componentId`, `componentName` |
//! | Navigation button | `RNN.NavigationButtonPressed` | `componentId`, `buttonId` |
//! | Bottom tab | `RNN.BottomTabSelected` | `unselectedTabIndex`, `selectedTabIndex` |
//! | Modal dismissed | `RNN.ModalDismissed` | `componentId` |

use std::fmt;
use std::rc::Rc;

use serde_json::{Value, json};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::controller::ComponentId;
use crate::error::EmitError;

const APP_LAUNCHED: &str = "RNN.AppLaunched";
const COMMAND_COMPLETED: &str = "RNN.CommandCompleted";
const COMPONENT_DID_APPEAR: &str = "RNN.ComponentDidAppear";
const COMPONENT_DID_DISAPPEAR: &str = "RNN.ComponentDidDisappear";
const NAVIGATION_BUTTON_PRESSED: &str = "RNN.NavigationButtonPressed";
const BOTTOM_TAB_SELECTED: &str = "RNN.BottomTabSelected";
const MODAL_DISMISSED: &str = "RNN.ModalDismissed";

/// A notification for the embedding runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    AppLaunched,
    CommandCompleted {
        command_id: String,
        /// Milliseconds since the Unix epoch.
        completion_time: u64,
    },
    ComponentDidAppear {
        component_id: ComponentId,
        component_name: String,
    },
    ComponentDidDisappear {
        component_id: ComponentId,
        component_name: String,
    },
    NavigationButtonPressed {
        component_id: ComponentId,
        button_id: String,
    },
    BottomTabSelected {
        unselected_tab_index: usize,
        selected_tab_index: usize,
    },
    ModalDismissed {
        component_id: ComponentId,
    },
}

impl NavigationEvent {
    /// Stable event name on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AppLaunched => APP_LAUNCHED,
            Self::CommandCompleted { .. } => COMMAND_COMPLETED,
            Self::ComponentDidAppear { .. } => COMPONENT_DID_APPEAR,
            Self::ComponentDidDisappear { .. } => COMPONENT_DID_DISAPPEAR,
            Self::NavigationButtonPressed { .. } => NAVIGATION_BUTTON_PRESSED,
            Self::BottomTabSelected { .. } => BOTTOM_TAB_SELECTED,
            Self::ModalDismissed { .. } => MODAL_DISMISSED,
        }
    }

    /// JSON payload with camelCase keys.
    pub fn payload(&self) -> Value {
        match self {
            Self::AppLaunched => json!({}),
            Self::CommandCompleted {
                command_id,
                completion_time,
            } => json!({ "commandId": command_id, "completionTime": completion_time }),
            Self::ComponentDidAppear {
                component_id,
                component_name,
            }
            | Self::ComponentDidDisappear {
                component_id,
                component_name,
            } => json!({ "componentId": component_id, "componentName": component_name }),
            Self::NavigationButtonPressed {
                component_id,
                button_id,
            } => json!({ "componentId": component_id, "buttonId": button_id }),
            Self::BottomTabSelected {
                unselected_tab_index,
                selected_tab_index,
            } => json!({
                "unselectedTabIndex": unselected_tab_index,
                "selectedTabIndex": selected_tab_index,
            }),
            Self::ModalDismissed { component_id } => json!({ "componentId": component_id }),
        }
    }
}

/// Delivery endpoint for [`NavigationEvent`]s.
pub trait EventSink {
    /// Deliver one event.
    fn send(&self, event: &NavigationEvent) -> Result<(), EmitError>;
}

/// Typed, cloneable front end over an [`EventSink`].
#[derive(Clone)]
pub struct EventEmitter {
    sink: Rc<dyn EventSink>,
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter").finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Create an emitter delivering to `sink`.
    pub fn new(sink: Rc<dyn EventSink>) -> Self {
        Self { sink }
    }

    pub fn app_launched(&self) {
        self.emit(NavigationEvent::AppLaunched);
    }

    /// Report a finished command, stamped with the current wall-clock time.
    pub fn command_completed(&self, command_id: &str) {
        self.emit(NavigationEvent::CommandCompleted {
            command_id: command_id.to_owned(),
            completion_time: now_millis(),
        });
    }

    pub fn component_did_appear(&self, id: &ComponentId, component_name: &str) {
        self.emit(NavigationEvent::ComponentDidAppear {
            component_id: id.clone(),
            component_name: component_name.to_owned(),
        });
    }

    pub fn component_did_disappear(&self, id: &ComponentId, component_name: &str) {
        self.emit(NavigationEvent::ComponentDidDisappear {
            component_id: id.clone(),
            component_name: component_name.to_owned(),
        });
    }

    pub fn navigation_button_pressed(&self, id: &ComponentId, button_id: &str) {
        self.emit(NavigationEvent::NavigationButtonPressed {
            component_id: id.clone(),
            button_id: button_id.to_owned(),
        });
    }

    pub fn bottom_tab_selected(&self, unselected_tab_index: usize, selected_tab_index: usize) {
        self.emit(NavigationEvent::BottomTabSelected {
            unselected_tab_index,
            selected_tab_index,
        });
    }

    pub fn modal_dismissed(&self, id: &ComponentId) {
        self.emit(NavigationEvent::ModalDismissed {
            component_id: id.clone(),
        });
    }

    /// Send an arbitrary event. Failures are logged and swallowed.
    pub fn emit(&self, event: NavigationEvent) {
        tracing::trace!(event = event.name(), "emit");
        if let Err(err) = self.sink.send(&event) {
            tracing::warn!(event = event.name(), %err, "event emission failed");
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
