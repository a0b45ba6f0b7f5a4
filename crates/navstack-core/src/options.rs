#![forbid(unsafe_code)]

//! Presentation options.
//!
//! Options arrive as JSON from the embedding runtime. Every field is
//! optional so that a controller's own options can be layered over the
//! presenter's defaults with [`Options::merged_over`]; anything still unset
//! after merging falls back to the built-in transition defaults.
//!
//! ```
//! use navstack_core::Options;
//!
//! let options = Options::from_json(
//!     r#"{ "animations": { "showModal": { "durationMs": 120, "easing": "linear" } } }"#,
//! )?;
//! let show = options.show_modal_transition();
//! assert_eq!(show.duration.as_millis(), 120);
//! assert!(show.enabled);
//! # Ok::<(), navstack_core::NavError>(())
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::NavError;

/// Progress curve applied to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Decelerating; the usual curve for entrances.
    #[default]
    EaseOut,
    /// Accelerating; the usual curve for exits.
    EaseIn,
    /// S-curve.
    EaseInOut,
}

impl Easing {
    /// Map linear progress in `[0.0, 1.0]` onto this curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseIn => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

/// Overrides for a single kind of transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransitionOptions {
    pub enabled: Option<bool>,
    pub duration_ms: Option<u64>,
    pub easing: Option<Easing>,
}

impl TransitionOptions {
    /// Fields set on `self` win; unset fields come from `base`.
    pub fn merged_over(&self, base: &Self) -> Self {
        Self {
            enabled: self.enabled.or(base.enabled),
            duration_ms: self.duration_ms.or(base.duration_ms),
            easing: self.easing.or(base.easing),
        }
    }

    /// Fill every unset field from `fallback`.
    pub fn resolve(&self, fallback: ResolvedTransition) -> ResolvedTransition {
        ResolvedTransition {
            enabled: self.enabled.unwrap_or(fallback.enabled),
            duration: self
                .duration_ms
                .map_or(fallback.duration, Duration::from_millis),
            easing: self.easing.unwrap_or(fallback.easing),
        }
    }
}

/// Modal transition overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationOptions {
    pub show_modal: TransitionOptions,
    pub dismiss_modal: TransitionOptions,
}

/// Presentation options for a controller or for the presenter's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub animations: AnimationOptions,
}

impl Options {
    /// Parse options from the runtime's JSON representation.
    pub fn from_json(json: &str) -> Result<Self, NavError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Options with both modal transitions switched off.
    pub fn without_animations() -> Self {
        let off = TransitionOptions {
            enabled: Some(false),
            ..TransitionOptions::default()
        };
        Self {
            animations: AnimationOptions {
                show_modal: off.clone(),
                dismiss_modal: off,
            },
        }
    }

    /// Layer `self` over `defaults`.
    pub fn merged_over(&self, defaults: &Self) -> Self {
        Self {
            animations: AnimationOptions {
                show_modal: self
                    .animations
                    .show_modal
                    .merged_over(&defaults.animations.show_modal),
                dismiss_modal: self
                    .animations
                    .dismiss_modal
                    .merged_over(&defaults.animations.dismiss_modal),
            },
        }
    }

    /// Concrete parameters for presenting a modal.
    pub fn show_modal_transition(&self) -> ResolvedTransition {
        self.animations
            .show_modal
            .resolve(ResolvedTransition::SHOW_MODAL)
    }

    /// Concrete parameters for dismissing a modal.
    pub fn dismiss_modal_transition(&self) -> ResolvedTransition {
        self.animations
            .dismiss_modal
            .resolve(ResolvedTransition::DISMISS_MODAL)
    }
}

/// Fully resolved transition parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTransition {
    pub enabled: bool,
    pub duration: Duration,
    pub easing: Easing,
}

impl ResolvedTransition {
    /// Built-in entrance used when nothing overrides it.
    pub const SHOW_MODAL: Self = Self {
        enabled: true,
        duration: Duration::from_millis(200),
        easing: Easing::EaseOut,
    };

    /// Built-in exit used when nothing overrides it.
    pub const DISMISS_MODAL: Self = Self {
        enabled: true,
        duration: Duration::from_millis(150),
        easing: Easing::EaseIn,
    };

    /// A transition that completes immediately.
    pub const INSTANT: Self = Self {
        enabled: false,
        duration: Duration::ZERO,
        easing: Easing::Linear,
    };

    /// Whether this transition takes any time at all.
    #[inline]
    pub fn is_animated(&self) -> bool {
        self.enabled && !self.duration.is_zero()
    }
}
