//! Resolved interaction snapshots.
//!
//! An [`InteractionContext`] is what an interactable hands out when queried:
//! the action name used as the input key, the prompt shown to the player,
//! the callback that performs the interaction and, when the interactor asked
//! for them, the [`InteractionArgs`] identifying both participants.
//!
//! Contexts are immutable and cheap to clone (shared strings and callback).
//! They are rebuilt on every solve pass and never cached across frames.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::identity::{InteractableId, InteractorId};

/// Identities of the two participants of an interaction.
///
/// Only produced when the interactor opted into argument generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionArgs {
    /// The interactor performing the interaction.
    pub interactor: InteractorId,
    /// The interactable being interacted with.
    pub interactable: InteractableId,
}

impl InteractionArgs {
    /// Creates an argument pair.
    #[must_use]
    pub const fn new(interactor: InteractorId, interactable: InteractableId) -> Self {
        Self {
            interactor,
            interactable,
        }
    }
}

/// Callback bound into a context. Receives the context's arguments, if any.
pub type InteractCallback = Rc<dyn Fn(Option<InteractionArgs>)>;

/// Immutable snapshot of one currently offered interaction.
///
/// # Equality
///
/// Two contexts are equal when they describe the same offer (action name,
/// prompt, source and arguments). The bound callback is not compared, since
/// every solve pass binds a fresh one.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use interplay_core::context::InteractionContext;
/// use interplay_core::identity::InteractableId;
///
/// let opened = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&opened);
/// let context = InteractionContext::new(
///     "Interact",
///     "Open Door",
///     InteractableId::new(1),
///     Rc::new(move |_| flag.set(true)),
/// );
///
/// assert_eq!(context.action_name(), "Interact");
/// assert!(context.args().is_none());
/// context.invoke();
/// assert!(opened.get());
/// ```
#[derive(Clone)]
pub struct InteractionContext {
    action_name: Rc<str>,
    prompt: Rc<str>,
    source: InteractableId,
    callback: InteractCallback,
    args: Option<InteractionArgs>,
}

impl InteractionContext {
    /// Creates a context without interaction arguments.
    pub fn new(
        action_name: impl Into<Rc<str>>,
        prompt: impl Into<Rc<str>>,
        source: InteractableId,
        callback: InteractCallback,
    ) -> Self {
        Self {
            action_name: action_name.into(),
            prompt: prompt.into(),
            source,
            callback,
            args: None,
        }
    }

    /// Returns this context stamped with interaction arguments.
    #[must_use]
    pub fn with_args(mut self, args: InteractionArgs) -> Self {
        self.args = Some(args);
        self
    }

    /// The action name, used as the lookup key for input events.
    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    /// Shared handle to the action name.
    #[must_use]
    pub fn action_key(&self) -> Rc<str> {
        Rc::clone(&self.action_name)
    }

    /// The prompt shown to the player, e.g. "Take Item".
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The interactable this context was produced by.
    #[must_use]
    pub const fn source(&self) -> InteractableId {
        self.source
    }

    /// Interaction arguments, if the interactor asked for them.
    #[must_use]
    pub const fn args(&self) -> Option<InteractionArgs> {
        self.args
    }

    /// Runs the bound callback with this context's arguments.
    pub fn invoke(&self) {
        (self.callback)(self.args);
    }
}

impl PartialEq for InteractionContext {
    fn eq(&self, other: &Self) -> bool {
        self.action_name == other.action_name
            && self.prompt == other.prompt
            && self.source == other.source
            && self.args == other.args
    }
}

impl fmt::Debug for InteractionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionContext")
            .field("action_name", &self.action_name)
            .field("prompt", &self.prompt)
            .field("source", &self.source)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
