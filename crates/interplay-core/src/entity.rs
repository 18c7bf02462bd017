//! Interactable entities.
//!
//! An [`InteractableEntity`] owns an ordered, fixed list of
//! [`InteractionBehaviour`]s and turns the currently available ones into
//! [`InteractionContext`]s whenever a solver queries it.
//!
//! # Hooks
//!
//! Each entity exposes three notifications:
//! - **query**: fired at the start of every enumeration, before availability
//!   is evaluated, so listeners can refresh derived state
//! - **performed**: fired whenever any owned behaviour completes a perform
//! - **ended**: fired each time a solver reports that this entity dropped out
//!   of its candidate set
//!
//! # Handles
//!
//! Entities are shared as `Rc<InteractableEntity>`. Contexts handed out by an
//! entity keep only a `Weak` handle to it, so a context outliving its entity
//! does nothing when invoked.
//!
//! # Example
//!
//! ```
//! use interplay_core::behaviour::{Conditional, InteractionBehaviour};
//! use interplay_core::entity::{InteractableEntity, InteractableRegistry};
//!
//! let mut registry = InteractableRegistry::new();
//! let chest = InteractableEntity::spawn(
//!     &mut registry,
//!     vec![
//!         InteractionBehaviour::new("Interact", "Open Chest").unwrap(),
//!         InteractionBehaviour::new("Kick", "Kick Chest")
//!             .unwrap()
//!             .with_availability(Conditional::new(|| false)),
//!     ],
//! );
//!
//! let offered: Vec<_> = chest.interactions().iter().map(|c| c.prompt().to_string()).collect();
//! assert_eq!(offered, vec!["Open Chest"]);
//! assert!(registry.upgrade(chest.id()).unwrap().is_some());
//! ```

use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::behaviour::InteractionBehaviour;
use crate::context::{InteractCallback, InteractionArgs, InteractionContext};
use crate::identity::{IdentityRegistry, InteractableId, InteractorId};
use crate::signal::{Signal, Subscription};

/// Registry of interactables. Entries are `Weak` so the registry never keeps
/// an entity alive.
pub type InteractableRegistry = IdentityRegistry<InteractableId, Weak<InteractableEntity>>;

/// An object offering one or more named interactions.
pub struct InteractableEntity {
    id: InteractableId,
    this: Weak<InteractableEntity>,
    behaviours: Vec<InteractionBehaviour>,
    queried: Signal<()>,
    performed: Signal<()>,
    ended: Signal<()>,
    /// Links from each behaviour's "performed" to the entity's.
    _forwarding: Vec<Subscription>,
}

impl InteractableEntity {
    /// Creates an entity with an already assigned identity.
    ///
    /// Prefer [`InteractableEntity::spawn`], which also registers it.
    #[must_use]
    pub fn new(id: InteractableId, behaviours: Vec<InteractionBehaviour>) -> Rc<Self> {
        Rc::new_cyclic(|this| {
            let performed = Signal::new();
            let forwarding = behaviours
                .iter()
                .map(|behaviour| {
                    let entity_performed = performed.clone();
                    behaviour.on_performed(move |()| {
                        entity_performed.emit(&());
                    })
                })
                .collect();

            Self {
                id,
                this: this.clone(),
                behaviours,
                queried: Signal::new(),
                performed,
                ended: Signal::new(),
                _forwarding: forwarding,
            }
        })
    }

    /// Registers a new entity and returns a handle to it.
    ///
    /// The registry keeps a `Weak` handle under the assigned identity.
    pub fn spawn(
        registry: &mut InteractableRegistry,
        behaviours: Vec<InteractionBehaviour>,
    ) -> Rc<Self> {
        registry.register_with(|id| {
            let entity = Self::new(id, behaviours);
            (Rc::downgrade(&entity), entity)
        })
    }

    /// This entity's identity.
    #[must_use]
    pub const fn id(&self) -> InteractableId {
        self.id
    }

    /// Owned behaviours in declaration order.
    #[must_use]
    pub fn behaviours(&self) -> &[InteractionBehaviour] {
        &self.behaviours
    }

    /// Returns contexts for every currently available behaviour, without
    /// interaction arguments.
    #[must_use]
    pub fn interactions(&self) -> Vec<InteractionContext> {
        let mut out = Vec::with_capacity(self.behaviours.len());
        self.collect_interactions(None, &mut out);
        out
    }

    /// Returns contexts for every currently available behaviour, stamped with
    /// `InteractionArgs(interactor, self.id())`.
    #[must_use]
    pub fn interactions_for(&self, interactor: InteractorId) -> Vec<InteractionContext> {
        let mut out = Vec::with_capacity(self.behaviours.len());
        self.collect_interactions(Some(interactor), &mut out);
        out
    }

    /// Appends contexts for every currently available behaviour to `out`.
    ///
    /// Fires the query hook first, then walks behaviours in declaration order.
    /// Contexts carry arguments only when `interactor` is given. Behaviours
    /// sharing an action name each produce a context; the consumer's map
    /// keeps the last one.
    pub fn collect_interactions(
        &self,
        interactor: Option<InteractorId>,
        out: &mut Vec<InteractionContext>,
    ) {
        self.queried.emit(&());

        for (index, behaviour) in self.behaviours.iter().enumerate() {
            if !behaviour.is_interactable() {
                continue;
            }

            let this = self.this.clone();
            let callback: InteractCallback = Rc::new(move |args| {
                if let Some(entity) = this.upgrade() {
                    entity.perform(index, args);
                }
            });

            let context = InteractionContext::new(
                behaviour.action_key(),
                behaviour.prompt_key(),
                self.id,
                callback,
            );
            out.push(match interactor {
                Some(interactor) => context.with_args(InteractionArgs::new(interactor, self.id)),
                None => context,
            });
        }
    }

    /// Performs the behaviour at `index`. Returns true if its effect ran.
    fn perform(&self, index: usize, args: Option<InteractionArgs>) -> bool {
        self.behaviours
            .get(index)
            .is_some_and(|behaviour| behaviour.perform(args))
    }

    /// Reports that a solver stopped engaging this entity.
    ///
    /// Fires the "ended" hook once per call; callers own deduplication.
    pub fn end_interaction(&self) {
        debug!(interactable = %self.id, "interaction ended");
        self.ended.emit(&());
    }

    /// Listens for the start of every enumeration.
    pub fn on_query(&self, listener: impl Fn(&()) + 'static) -> Subscription {
        self.queried.connect(listener)
    }

    /// Listens for completed performs of any owned behaviour.
    pub fn on_performed(&self, listener: impl Fn(&()) + 'static) -> Subscription {
        self.performed.connect(listener)
    }

    /// Listens for "ended" notifications.
    pub fn on_ended(&self, listener: impl Fn(&()) + 'static) -> Subscription {
        self.ended.connect(listener)
    }
}

impl fmt::Debug for InteractableEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractableEntity")
            .field("id", &self.id)
            .field("behaviours", &self.behaviours)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
