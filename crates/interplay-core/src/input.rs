//! Shared input event stream.
//!
//! The input layer turns device activity into [`InputEvent`]s keyed by a
//! logical action name and publishes them on an [`InputStream`]. Every solver
//! subscribes to the same stream for its whole lifetime and reacts only to
//! triggered events whose action name it currently offers.
//!
//! Device bindings, glyphs and key labels are resolved elsewhere; here an
//! action name is an opaque string.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use interplay_core::input::{InputEvent, InputStream};
//!
//! let stream = InputStream::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&seen);
//! let _guard = stream.subscribe(move |event| sink.borrow_mut().push(event.action.clone()));
//!
//! stream.publish(&InputEvent::triggered("Interact"));
//! assert_eq!(*seen.borrow(), vec!["Interact".to_string()]);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::signal::{Signal, Subscription};

/// Raw value carried by an input event.
///
/// The interaction engine ignores it; it is forwarded for listeners that care
/// (analog triggers, sticks).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputValue {
    /// No value attached.
    #[default]
    None,
    /// Digital button state.
    Button(bool),
    /// Single-axis analog value.
    Axis(f32),
    /// Two-axis analog value.
    Vector(Vec2),
}

/// One event on the input stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Logical action name, matched against interaction action names.
    pub action: String,
    /// Whether the action was performed. Solvers ignore untriggered events.
    pub triggered: bool,
    /// Raw device value.
    #[serde(default)]
    pub value: InputValue,
}

impl InputEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(action: impl Into<String>, triggered: bool, value: InputValue) -> Self {
        Self {
            action: action.into(),
            triggered,
            value,
        }
    }

    /// Creates a triggered button press for `action`.
    #[must_use]
    pub fn triggered(action: impl Into<String>) -> Self {
        Self::new(action, true, InputValue::Button(true))
    }

    /// Creates an untriggered event for `action` (started, cancelled, released).
    #[must_use]
    pub fn untriggered(action: impl Into<String>) -> Self {
        Self::new(action, false, InputValue::Button(false))
    }
}

/// Broadcast channel of [`InputEvent`]s.
///
/// Cloning the stream yields another handle to the same subscriber list, so
/// the input layer and every interactor can each hold one.
#[derive(Debug, Clone, Default)]
pub struct InputStream {
    signal: Signal<InputEvent>,
}

impl InputStream {
    /// Creates a stream with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Delivers `event` to every subscriber, in subscription order.
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, event: &InputEvent) -> usize {
        self.signal.emit(event)
    }

    /// Subscribes to every future event. Dropping the guard unsubscribes.
    pub fn subscribe(&self, listener: impl Fn(&InputEvent) + 'static) -> Subscription {
        self.signal.connect(listener)
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.signal.listener_count()
    }
}
