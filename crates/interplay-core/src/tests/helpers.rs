//! Test helper functions for building interactables and observing hooks.
//!
//! This module provides factory functions and setup utilities that make
//! writing tests more ergonomic and consistent.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing_subscriber::EnvFilter;

use crate::behaviour::InteractionBehaviour;
use crate::entity::{InteractableEntity, InteractableRegistry};
use crate::signal::Subscription;
use crate::solver::{ActiveInteractions, InteractionSolver};

// =============================================================================
// Tracing
// =============================================================================

/// Installs a test-writer subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(false)
        .compact()
        .try_init();
}

// =============================================================================
// Entity Factory Functions
// =============================================================================

/// Builds an always-available behaviour.
///
/// # Panics
///
/// Panics if `action` is empty.
pub fn behaviour(action: &str, prompt: &str) -> InteractionBehaviour {
    InteractionBehaviour::new(action, prompt).unwrap()
}

/// Spawns an entity offering one always-available interaction.
pub fn spawn_simple(
    registry: &mut InteractableRegistry,
    action: &str,
    prompt: &str,
) -> Rc<InteractableEntity> {
    InteractableEntity::spawn(registry, vec![behaviour(action, prompt)])
}

// =============================================================================
// Observation
// =============================================================================

/// Counts the hook notifications of one entity.
///
/// Listeners stay connected for as long as the watcher lives.
pub struct HookCounter {
    /// Number of query notifications.
    pub queried: Rc<Cell<u32>>,
    /// Number of performed notifications.
    pub performed: Rc<Cell<u32>>,
    /// Number of ended notifications.
    pub ended: Rc<Cell<u32>>,
    _guards: Vec<Subscription>,
}

impl HookCounter {
    /// Connects counters to every hook of `entity`.
    pub fn watch(entity: &InteractableEntity) -> Self {
        let queried = Rc::new(Cell::new(0));
        let performed = Rc::new(Cell::new(0));
        let ended = Rc::new(Cell::new(0));

        let guards = vec![
            entity.on_query(increment(&queried)),
            entity.on_performed(increment(&performed)),
            entity.on_ended(increment(&ended)),
        ];

        Self {
            queried,
            performed,
            ended,
            _guards: guards,
        }
    }
}

fn increment(counter: &Rc<Cell<u32>>) -> impl Fn(&()) + 'static {
    let counter = Rc::clone(counter);
    move |_: &()| counter.set(counter.get() + 1)
}

/// Records every map a solver publishes.
pub struct PublicationLog {
    /// Published maps, oldest first.
    pub maps: Rc<RefCell<Vec<ActiveInteractions>>>,
    _guard: Subscription,
}

impl PublicationLog {
    /// Starts recording `solver`'s publications.
    pub fn attach(solver: &InteractionSolver) -> Self {
        let maps = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&maps);
        let guard = solver.on_published(move |map| sink.borrow_mut().push(map.clone()));
        Self {
            maps,
            _guard: guard,
        }
    }

    /// Number of publications so far.
    pub fn len(&self) -> usize {
        self.maps.borrow().len()
    }

    /// Action names of the most recent publication.
    pub fn last_actions(&self) -> Vec<String> {
        self.maps
            .borrow()
            .last()
            .map(|map| map.iter().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default()
    }
}
