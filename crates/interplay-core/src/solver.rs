//! The per-interactor interaction solver.
//!
//! An [`InteractionSolver`] keeps the set of interactions currently available
//! to one interactor and routes input events to them.
//!
//! # Solve pass
//!
//! [`InteractionSolver::solve`] runs, in order:
//! 1. Build a fresh active map: walk candidates in input order, collect each
//!    one's available interactions and insert them by action name. A later
//!    candidate overwrites an earlier one on the same action name
//!    (last-candidate-wins); within one entity the last declared behaviour
//!    wins the same way.
//! 2. Publish the map to `on_published` listeners, every call, even when the
//!    map is empty or unchanged.
//! 3. Call [`InteractableEntity::end_interaction`] exactly once on every entity
//!    that was a candidate last pass and is not one now.
//! 4. Remember the current candidates for the next pass.
//!
//! [`InteractionSolver::reset`] is `solve(&[])`.
//!
//! # Input routing
//!
//! From construction until disposal the solver is subscribed to the shared
//! [`InputStream`]. A triggered event whose action name is in the active map
//! invokes that context's callback synchronously; anything else is ignored.
//! At most one callback runs per event and nothing is queued.
//!
//! # Lifetime
//!
//! The input subscription is a guard owned by the solver:
//! [`InteractionSolver::dispose`] releases it early, dropping the solver
//! releases it otherwise. Candidates from the previous pass are held as `Weak`
//! handles, so the solver never keeps an entity alive and never notifies one
//! that has been dropped.
//!
//! # Re-entrancy
//!
//! No `RefCell` borrow is held while calling out to entity hooks, publication
//! listeners or interaction callbacks.
//!
//! # Example
//!
//! ```
//! use interplay_core::behaviour::InteractionBehaviour;
//! use interplay_core::entity::{InteractableEntity, InteractableRegistry};
//! use interplay_core::identity::InteractorId;
//! use interplay_core::input::{InputEvent, InputStream};
//! use interplay_core::solver::{InteractionSolver, SolverConfig};
//!
//! let input = InputStream::new();
//! let mut registry = InteractableRegistry::new();
//! let door = InteractableEntity::spawn(
//!     &mut registry,
//!     vec![InteractionBehaviour::new("Interact", "Open Door").unwrap()],
//! );
//!
//! let mut solver = InteractionSolver::new(InteractorId::new(1), SolverConfig::default(), &input);
//! solver.solve(&[door]);
//!
//! assert_eq!(solver.active().get("Interact").unwrap().prompt(), "Open Door");
//! assert!(solver.handle_input(&InputEvent::triggered("Interact")));
//!
//! solver.reset();
//! assert!(solver.active().is_empty());
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::context::InteractionContext;
use crate::entity::InteractableEntity;
use crate::identity::InteractorId;
use crate::input::{InputEvent, InputStream};
use crate::signal::{Signal, Subscription};

// =============================================================================
// Configuration
// =============================================================================

/// Per-solver settings, fixed at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Stamp every context with `InteractionArgs(interactor, interactable)`.
    pub generate_args: bool,
}

// =============================================================================
// Active Interactions
// =============================================================================

/// Read-only map of the interactions available right now, keyed by action name.
///
/// Iteration is ordered by action name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveInteractions {
    entries: BTreeMap<Rc<str>, InteractionContext>,
}

impl ActiveInteractions {
    /// Inserts `context`, replacing any entry with the same action name.
    fn insert(&mut self, context: InteractionContext) {
        self.entries.insert(context.action_key(), context);
    }

    /// Returns the context offered under `action_name`.
    #[must_use]
    pub fn get(&self, action_name: &str) -> Option<&InteractionContext> {
        self.entries.get(action_name)
    }

    /// Returns true if an interaction is offered under `action_name`.
    #[must_use]
    pub fn contains(&self, action_name: &str) -> bool {
        self.entries.contains_key(action_name)
    }

    /// Number of offered interactions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is offered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(action name, context)` pairs ordered by action name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InteractionContext)> + '_ {
        self.entries.iter().map(|(name, context)| (&**name, context))
    }

    /// Iterates offered contexts ordered by action name.
    pub fn contexts(&self) -> impl Iterator<Item = &InteractionContext> + '_ {
        self.entries.values()
    }
}

// =============================================================================
// Interaction Solver
// =============================================================================

/// State shared between the solver and its input listener.
#[derive(Default)]
struct SolverState {
    active: Rc<ActiveInteractions>,
    previous: Vec<Weak<InteractableEntity>>,
    /// Reused between passes as the collection buffer.
    scratch: Vec<InteractionContext>,
}

/// Resolves available interactions for one interactor and routes input to them.
pub struct InteractionSolver {
    interactor: InteractorId,
    config: SolverConfig,
    state: Rc<RefCell<SolverState>>,
    published: Signal<ActiveInteractions>,
    input: Option<Subscription>,
}

impl InteractionSolver {
    /// Creates a solver for `interactor` and subscribes it to `input`.
    #[must_use]
    pub fn new(interactor: InteractorId, config: SolverConfig, input: &InputStream) -> Self {
        let state = Rc::new(RefCell::new(SolverState::default()));

        let listener_state = Rc::downgrade(&state);
        let subscription = input.subscribe(move |event| {
            if let Some(state) = listener_state.upgrade() {
                route(&state, interactor, event);
            }
        });

        Self {
            interactor,
            config,
            state,
            published: Signal::new(),
            input: Some(subscription),
        }
    }

    /// The interactor this solver works for.
    #[must_use]
    pub const fn interactor(&self) -> InteractorId {
        self.interactor
    }

    /// Settings fixed at construction.
    #[must_use]
    pub const fn config(&self) -> SolverConfig {
        self.config
    }

    /// Resolves the interactions offered by `candidates`, publishes them and
    /// ends every entity that dropped out since the previous pass.
    pub fn solve(&mut self, candidates: &[Rc<InteractableEntity>]) {
        let interactor = self.config.generate_args.then_some(self.interactor);

        let mut scratch = std::mem::take(&mut self.state.borrow_mut().scratch);
        let mut active = ActiveInteractions::default();
        for candidate in candidates {
            candidate.collect_interactions(interactor, &mut scratch);
            for context in scratch.drain(..) {
                active.insert(context);
            }
        }
        let active = Rc::new(active);

        let previous = {
            let mut state = self.state.borrow_mut();
            state.active = Rc::clone(&active);
            state.scratch = scratch;
            std::mem::replace(
                &mut state.previous,
                candidates.iter().map(Rc::downgrade).collect(),
            )
        };

        self.published.emit(&active);

        let ended = end_dropped(&previous, candidates);
        trace!(
            interactor = %self.interactor,
            candidates = candidates.len(),
            active = active.len(),
            ended,
            "solved interactions"
        );
    }

    /// Clears every interaction, ending all previous candidates.
    ///
    /// Equivalent to `solve(&[])`.
    pub fn reset(&mut self) {
        self.solve(&[]);
    }

    /// Snapshot of the interactions published by the last pass.
    #[must_use]
    pub fn active(&self) -> Rc<ActiveInteractions> {
        Rc::clone(&self.state.borrow().active)
    }

    /// Listens for the map published on every `solve`/`reset`.
    pub fn on_published(
        &self,
        listener: impl Fn(&ActiveInteractions) + 'static,
    ) -> Subscription {
        self.published.connect(listener)
    }

    /// Routes one input event as if it came from the input stream.
    ///
    /// Returns true if an interaction callback ran. Works after disposal too;
    /// disposal only detaches the solver from the shared stream.
    pub fn handle_input(&self, event: &InputEvent) -> bool {
        route(&self.state, self.interactor, event)
    }

    /// Returns true while the solver is subscribed to the input stream.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.input.as_ref().is_some_and(Subscription::is_active)
    }

    /// Unsubscribes from the input stream. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(subscription) = self.input.take() {
            subscription.cancel();
            debug!(interactor = %self.interactor, "solver disposed");
        }
    }
}

impl fmt::Debug for InteractionSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("InteractionSolver")
            .field("interactor", &self.interactor)
            .field("config", &self.config)
            .field("active", &state.active.len())
            .field("previous", &state.previous.len())
            .field("subscribed", &self.is_subscribed())
            .finish()
    }
}

/// Invokes the context matching a triggered event. Returns true if one ran.
fn route(state: &RefCell<SolverState>, interactor: InteractorId, event: &InputEvent) -> bool {
    if !event.triggered {
        return false;
    }

    let context = state.borrow().active.get(&event.action).cloned();
    let Some(context) = context else {
        return false;
    };

    debug!(
        interactor = %interactor,
        action = %event.action,
        interactable = %context.source(),
        "dispatching interaction"
    );
    context.invoke();
    true
}

/// Ends every entity in `previous` that is absent from `current`, once each.
///
/// Returns the number of entities ended.
fn end_dropped(previous: &[Weak<InteractableEntity>], current: &[Rc<InteractableEntity>]) -> usize {
    let mut ended = 0;
    for (index, stale) in previous.iter().enumerate() {
        let still_current = current
            .iter()
            .any(|candidate| std::ptr::eq(stale.as_ptr(), Rc::as_ptr(candidate)));
        if still_current {
            continue;
        }
        if previous[..index].iter().any(|earlier| earlier.ptr_eq(stale)) {
            continue;
        }
        if let Some(entity) = stale.upgrade() {
            entity.end_interaction();
            ended += 1;
        }
    }
    ended
}

// =============================================================================
// Tests
// =============================================================================
