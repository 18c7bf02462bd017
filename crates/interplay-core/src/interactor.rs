//! Interactors and candidate acquisition.
//!
//! An [`Interactor`] is the agent side of the system: it owns an identity, an
//! [`InteractionSolver`] and a [`CandidateSupplier`] deciding which entities
//! the solver should consider each tick.
//!
//! # Architecture
//!
//! The host drives interactors from its loop:
//! - [`Interactor::tick`] asks the supplier for candidates
//! - `None` means "no scan this tick" and leaves the solver untouched
//! - an empty list resets the solver, ending every previous candidate
//! - anything else is handed to [`InteractionSolver::solve`]
//!
//! Suppliers are a capability seam: [`supplier_fn`] adapts any
//! `FnMut(u64) -> Option<Vec<_>>` closure, and
//! [`ProximityScanner`](crate::supplier::ProximityScanner) is the bundled
//! ray-based one.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use interplay_core::behaviour::InteractionBehaviour;
//! use interplay_core::entity::{InteractableEntity, InteractableRegistry};
//! use interplay_core::identity::InteractorRegistry;
//! use interplay_core::input::InputStream;
//! use interplay_core::interactor::{supplier_fn, Interactor};
//! use interplay_core::solver::SolverConfig;
//!
//! let input = InputStream::new();
//! let mut interactables = InteractableRegistry::new();
//! let mut interactors = InteractorRegistry::new();
//!
//! let lever = InteractableEntity::spawn(
//!     &mut interactables,
//!     vec![InteractionBehaviour::new("Interact", "Pull Lever").unwrap()],
//! );
//!
//! let target = Rc::clone(&lever);
//! let mut player = Interactor::register(
//!     &mut interactors,
//!     "player",
//!     &input,
//!     SolverConfig::default(),
//!     supplier_fn(move |_tick| Some(vec![Rc::clone(&target)])),
//! );
//!
//! assert!(player.tick(0));
//! assert!(player.solver().active().contains("Interact"));
//! ```

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::entity::InteractableEntity;
use crate::identity::{InteractorId, InteractorRegistry};
use crate::input::InputStream;
use crate::solver::{InteractionSolver, SolverConfig};

// =============================================================================
// Candidate Supplier
// =============================================================================

/// Decides which interactables an interactor considers on a given tick.
pub trait CandidateSupplier {
    /// Returns this tick's candidates, or `None` to skip the tick.
    ///
    /// Candidate order matters: on action-name collisions the later
    /// candidate wins.
    fn scan(&mut self, tick: u64) -> Option<Vec<Rc<InteractableEntity>>>;
}

/// Supplier backed by a closure. Built by [`supplier_fn`].
pub struct SupplierFn<F> {
    scan: F,
}

/// Adapts a closure into a [`CandidateSupplier`].
pub fn supplier_fn<F>(scan: F) -> SupplierFn<F>
where
    F: FnMut(u64) -> Option<Vec<Rc<InteractableEntity>>>,
{
    SupplierFn { scan }
}

impl<F> CandidateSupplier for SupplierFn<F>
where
    F: FnMut(u64) -> Option<Vec<Rc<InteractableEntity>>>,
{
    fn scan(&mut self, tick: u64) -> Option<Vec<Rc<InteractableEntity>>> {
        (self.scan)(tick)
    }
}

impl<F> fmt::Debug for SupplierFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplierFn").finish_non_exhaustive()
    }
}

// =============================================================================
// Interactor
// =============================================================================

/// A registered agent that resolves and performs interactions.
///
/// Dropping an interactor disposes its solver.
pub struct Interactor {
    id: InteractorId,
    solver: InteractionSolver,
    supplier: Box<dyn CandidateSupplier>,
}

impl Interactor {
    /// Registers `handle` and builds an interactor subscribed to `input`.
    pub fn register<T>(
        registry: &mut InteractorRegistry<T>,
        handle: T,
        input: &InputStream,
        config: SolverConfig,
        supplier: impl CandidateSupplier + 'static,
    ) -> Self {
        let id = registry.register(handle);
        Self {
            id,
            solver: InteractionSolver::new(id, config, input),
            supplier: Box::new(supplier),
        }
    }

    /// This interactor's identity.
    #[must_use]
    pub const fn id(&self) -> InteractorId {
        self.id
    }

    /// The solver resolving this interactor's interactions.
    #[must_use]
    pub const fn solver(&self) -> &InteractionSolver {
        &self.solver
    }

    /// Mutable access to the solver, e.g. to solve outside of `tick`.
    pub fn solver_mut(&mut self) -> &mut InteractionSolver {
        &mut self.solver
    }

    /// Runs one acquisition step. Returns true if the supplier scanned.
    pub fn tick(&mut self, tick: u64) -> bool {
        let Some(candidates) = self.supplier.scan(tick) else {
            return false;
        };

        if candidates.is_empty() {
            self.solver.reset();
        } else {
            self.solver.solve(&candidates);
        }
        true
    }
}

impl Drop for Interactor {
    fn drop(&mut self) {
        debug!(interactor = %self.id, "interactor dropped");
        self.solver.dispose();
    }
}

impl fmt::Debug for Interactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interactor")
            .field("id", &self.id)
            .field("solver", &self.solver)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
