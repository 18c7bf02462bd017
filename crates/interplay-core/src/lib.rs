//! # Interplay Core
//!
//! Interaction resolution engine for games and simulations.
//!
//! Each tick, an interactor's candidate interactables are turned into a map of
//! available interactions keyed by input action name. That map is published
//! to observers such as a prompt display. When an input event arrives, the
//! matching interaction is performed.
//!
//! ## Architecture
//!
//! - **Identity** ([`identity`]): monotonic ids for interactors and
//!   interactables, issued by explicitly owned registries
//! - **Behaviours** ([`behaviour`]): one named interaction with pluggable
//!   availability and effect capabilities
//! - **Entities** ([`entity`]): ordered behaviour lists that produce
//!   [`InteractionContext`]s on query, with query/performed/ended hooks
//! - **Solver** ([`solver`]): per-interactor resolution, publication,
//!   drop-out notification and input routing
//! - **Interactors** ([`interactor`], [`supplier`]): registered agents that
//!   feed their solver from a candidate supplier such as [`ProximityScanner`]
//!
//! Everything runs on one thread. Handles are `Rc`/`Weak`, and notifications
//! are plain listener lists ([`signal`]) with guard-based unsubscription.
//!
//! ## Usage
//!
//! ```
//! use std::rc::Rc;
//! use interplay_core::{
//!     InputEvent, InputStream, InteractableEntity, InteractableRegistry,
//!     InteractionBehaviour, InteractionSolver, InteractorId, SolverConfig,
//! };
//!
//! let input = InputStream::new();
//! let mut registry = InteractableRegistry::new();
//! let door = InteractableEntity::spawn(
//!     &mut registry,
//!     vec![InteractionBehaviour::new("Interact", "Open Door").unwrap()],
//! );
//!
//! let mut solver = InteractionSolver::new(InteractorId::new(1), SolverConfig::default(), &input);
//! let _prompts = solver.on_published(|active| {
//!     for (action, context) in active.iter() {
//!         println!("[{action}] {}", context.prompt());
//!     }
//! });
//!
//! solver.solve(&[Rc::clone(&door)]);
//! input.publish(&InputEvent::triggered("Interact"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod behaviour;
pub mod clock;
pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod identity;
pub mod input;
pub mod interactor;
pub mod signal;
pub mod solver;
pub mod supplier;

#[cfg(test)]
mod tests;

pub use behaviour::{Availability, Effect, InteractionBehaviour};
pub use clock::TickClock;
pub use config::InteractionConfig;
pub use context::{InteractionArgs, InteractionContext};
pub use entity::{InteractableEntity, InteractableRegistry};
pub use error::{InteractionError, Result};
pub use identity::{IdentityRegistry, InteractableId, InteractorId, InteractorRegistry};
pub use input::{InputEvent, InputStream, InputValue};
pub use interactor::{supplier_fn, CandidateSupplier, Interactor};
pub use signal::{Signal, Subscription};
pub use solver::{ActiveInteractions, InteractionSolver, SolverConfig};
pub use supplier::{InteractionLayers, ProximityScanner, ScannerConfig};
