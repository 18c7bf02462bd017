//! Interaction behaviours and their capabilities.
//!
//! An [`InteractionBehaviour`] is one interaction offered by an interactable:
//! an action name (the input key), a prompt, and two capabilities chosen when
//! the behaviour is configured:
//!
//! - [`Availability`]: whether the interaction can be performed right now
//! - [`Effect`]: what performing it does
//!
//! Availability variants live in [`availability`]: [`Always`], [`Conditional`],
//! [`Cooldown`] and [`Limited`]. Any `Fn(Option<InteractionArgs>)` closure is
//! an [`Effect`]; [`InteractionBehaviour::with_effect_fn`] takes one directly.
//!
//! # Performing
//!
//! `interact` checks availability first. An unavailable behaviour ignores the
//! call silently. Otherwise the availability capability records the perform,
//! then the effect runs and the behaviour's "performed" listeners fire, all
//! synchronously on the caller's thread. An effect that re-enters the same
//! behaviour therefore sees the use already counted.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use interplay_core::behaviour::{InteractionBehaviour, Limited};
//!
//! let taken = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&taken);
//!
//! let behaviour = InteractionBehaviour::new("Interact", "Take Apple")
//!     .unwrap()
//!     .with_availability(Limited::new(1))
//!     .with_effect_fn(move |_| counter.set(counter.get() + 1));
//!
//! assert!(behaviour.interact());
//! assert!(!behaviour.interact());
//! assert_eq!(taken.get(), 1);
//! ```

pub mod availability;

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::context::InteractionArgs;
use crate::error::{InteractionError, Result};
use crate::signal::{Signal, Subscription};

pub use availability::{Always, Conditional, Cooldown, Limited};

// =============================================================================
// Capabilities
// =============================================================================

/// Decides whether a behaviour can be performed right now.
pub trait Availability {
    /// Returns true if the behaviour is currently available.
    ///
    /// Evaluated fresh on every query and every perform attempt.
    fn is_available(&self) -> bool;

    /// Called when an available behaviour is performed, before its effect runs.
    fn on_performed(&self) {}
}

/// What a behaviour does when performed.
pub trait Effect {
    /// Performs the effect. `args` is present when the interactor asked for
    /// interaction arguments.
    fn perform(&self, args: Option<InteractionArgs>);
}

impl<F> Effect for F
where
    F: Fn(Option<InteractionArgs>),
{
    fn perform(&self, args: Option<InteractionArgs>) {
        self(args);
    }
}

/// Effect that does nothing. The default for new behaviours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoEffect;

impl Effect for NoEffect {
    fn perform(&self, _args: Option<InteractionArgs>) {}
}

// =============================================================================
// Interaction Behaviour
// =============================================================================

/// One interaction offered by an interactable entity.
pub struct InteractionBehaviour {
    action_name: Rc<str>,
    prompt: Rc<str>,
    availability: Box<dyn Availability>,
    effect: Box<dyn Effect>,
    performed: Signal<()>,
}

impl InteractionBehaviour {
    /// Creates an always-available behaviour with no effect.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::EmptyActionName`] if `action_name` is empty.
    pub fn new(action_name: impl Into<String>, prompt: impl Into<String>) -> Result<Self> {
        let action_name: String = action_name.into();
        if action_name.is_empty() {
            return Err(InteractionError::EmptyActionName);
        }
        let prompt: String = prompt.into();

        Ok(Self {
            action_name: action_name.into(),
            prompt: prompt.into(),
            availability: Box::new(Always),
            effect: Box::new(NoEffect),
            performed: Signal::new(),
        })
    }

    /// Replaces the availability capability.
    #[must_use]
    pub fn with_availability(mut self, availability: impl Availability + 'static) -> Self {
        self.availability = Box::new(availability);
        self
    }

    /// Replaces the effect capability.
    #[must_use]
    pub fn with_effect(mut self, effect: impl Effect + 'static) -> Self {
        self.effect = Box::new(effect);
        self
    }

    /// Replaces the effect capability with a closure.
    #[must_use]
    pub fn with_effect_fn(self, effect: impl Fn(Option<InteractionArgs>) + 'static) -> Self {
        self.with_effect(effect)
    }

    /// The input action name this behaviour answers to.
    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    /// The prompt shown for this behaviour.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub(crate) fn action_key(&self) -> Rc<str> {
        Rc::clone(&self.action_name)
    }

    pub(crate) fn prompt_key(&self) -> Rc<str> {
        Rc::clone(&self.prompt)
    }

    /// Returns true if the behaviour can be performed right now.
    #[must_use]
    pub fn is_interactable(&self) -> bool {
        self.availability.is_available()
    }

    /// Performs the behaviour without arguments.
    ///
    /// Returns true if the effect ran; false if the behaviour was unavailable.
    pub fn interact(&self) -> bool {
        self.perform(None)
    }

    /// Performs the behaviour with interaction arguments.
    ///
    /// Returns true if the effect ran; false if the behaviour was unavailable.
    pub fn interact_with(&self, args: InteractionArgs) -> bool {
        self.perform(Some(args))
    }

    pub(crate) fn perform(&self, args: Option<InteractionArgs>) -> bool {
        if !self.is_interactable() {
            trace!(action = %self.action_name, "ignored interact on unavailable behaviour");
            return false;
        }

        // Recorded first so an effect re-entering this behaviour sees the use.
        self.availability.on_performed();
        self.effect.perform(args);
        self.performed.emit(&());
        true
    }

    /// Listens for completed performs of this behaviour.
    pub fn on_performed(&self, listener: impl Fn(&()) + 'static) -> Subscription {
        self.performed.connect(listener)
    }
}

impl fmt::Debug for InteractionBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionBehaviour")
            .field("action_name", &self.action_name)
            .field("prompt", &self.prompt)
            .field("performed_listeners", &self.performed.listener_count())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
