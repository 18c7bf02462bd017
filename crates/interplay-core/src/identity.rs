//! Identity types and the registries that issue them.
//!
//! Interactors and interactables each live in their own identity namespace:
//! - [`InteractorId`]: identity of an agent that engages interactables
//! - [`InteractableId`]: identity of an object offering interactions
//! - [`IdentityRegistry`]: monotonic issuer and lookup table for one namespace
//!
//! # Architecture
//!
//! Identities start at 1 and increase by one per registration. They are never
//! reused within a registry's lifetime and there is no unregister operation:
//! the registry behaves like an arena that only grows. Registries are plain
//! owned values, so each test (or each game session) builds its own tables
//! instead of sharing process-wide state.
//!
//! Storage uses a `BTreeMap` so iteration follows issue order.
//!
//! # Stale identities
//!
//! Interactables are registered as `Weak` handles. Once the entity is dropped
//! its identity still resolves, but to a dead handle:
//! [`IdentityRegistry::upgrade`] returns `Ok(None)` instead of a live entity.
//!
//! # Example
//!
//! ```
//! use interplay_core::identity::{IdentityRegistry, InteractorId};
//!
//! let mut players: IdentityRegistry<InteractorId, &str> = IdentityRegistry::new();
//! let alice = players.register("alice");
//! let bob = players.register("bob");
//!
//! assert_eq!(alice, InteractorId::new(1));
//! assert_eq!(bob, InteractorId::new(2));
//! assert_eq!(*players.get(bob).unwrap(), "bob");
//! assert!(players.get(InteractorId::new(99)).is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InteractionError, Result};

// =============================================================================
// Identity Types
// =============================================================================

/// Common behaviour of the identity newtypes.
///
/// Implemented by [`InteractorId`] and [`InteractableId`]. The associated
/// `KIND` names the namespace in errors and log fields.
pub trait Identity: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display {
    /// Namespace name used in errors and logs.
    const KIND: &'static str;

    /// Wraps a raw identity value.
    fn from_raw(raw: u64) -> Self;

    /// Returns the raw identity value.
    fn as_u64(self) -> u64;
}

macro_rules! define_identity {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Creates an identity from a raw `u64` value.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw `u64` value of this identity.
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl Identity for $name {
            const KIND: &'static str = $kind;

            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_identity!(
    /// Identity of an interactor (the agent side, e.g. the player).
    ///
    /// Never valid in the interactable namespace.
    InteractorId,
    "interactor"
);

define_identity!(
    /// Identity of an interactable entity.
    ///
    /// Never valid in the interactor namespace.
    InteractableId,
    "interactable"
);

// =============================================================================
// Identity Registry
// =============================================================================

/// Monotonic identity issuer and lookup table for one namespace.
///
/// # Type Parameters
///
/// - `K`: the identity type issued by this registry
/// - `T`: whatever the owner wants to resolve an identity to (a handle,
///   a name, a `Weak` pointer to the entity)
#[derive(Debug, Clone)]
pub struct IdentityRegistry<K, T> {
    /// Raw value of the next identity to issue. Starts at 1.
    next_id: u64,
    /// Registered entries in issue order.
    entries: BTreeMap<K, T>,
}

impl<K: Identity, T> IdentityRegistry<K, T> {
    /// Creates an empty registry whose first identity will be 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: BTreeMap::new(),
        }
    }

    /// Registers an entity and returns the identity assigned to it.
    pub fn register(&mut self, entity: T) -> K {
        self.register_with(|id| (entity, id))
    }

    /// Registers an entity built from its own freshly assigned identity.
    ///
    /// `build` receives the identity before anything is stored, so the entity
    /// can embed it. It returns the value to store and an arbitrary output
    /// handed back to the caller.
    ///
    /// # Example
    ///
    /// ```
    /// use interplay_core::identity::{IdentityRegistry, InteractableId};
    ///
    /// let mut registry: IdentityRegistry<InteractableId, String> = IdentityRegistry::new();
    /// let label = registry.register_with(|id| (format!("crate-{id}"), format!("made {id}")));
    ///
    /// assert_eq!(label, "made 1");
    /// assert_eq!(registry.get(InteractableId::new(1)).unwrap(), "crate-1");
    /// ```
    pub fn register_with<R>(&mut self, build: impl FnOnce(K) -> (T, R)) -> R {
        let id = K::from_raw(self.next_id);
        self.next_id += 1;

        let (entity, output) = build(id);
        self.entries.insert(id, entity);

        debug!(kind = K::KIND, id = %id, "registered identity");
        output
    }

    /// Looks up the entity registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::NotFound`] if this registry never issued `id`.
    pub fn get(&self, id: K) -> Result<&T> {
        self.entries.get(&id).ok_or(InteractionError::NotFound {
            kind: K::KIND,
            id: id.as_u64(),
        })
    }

    /// Returns true if `id` was issued by this registry.
    #[must_use]
    pub fn contains(&self, id: K) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns the identity the next registration will receive.
    #[must_use]
    pub fn next_id(&self) -> K {
        K::from_raw(self.next_id)
    }

    /// Returns the number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns issued identities in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.keys().copied()
    }

    /// Returns `(identity, entity)` pairs in ascending identity order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.entries.iter().map(|(id, entity)| (*id, entity))
    }
}

impl<K: Identity, E> IdentityRegistry<K, Weak<E>> {
    /// Resolves `id` to a live entity.
    ///
    /// Returns `Ok(None)` when the identity was issued but its entity has
    /// since been dropped.
    ///
    /// # Errors
    ///
    /// Returns [`InteractionError::NotFound`] if this registry never issued `id`.
    pub fn upgrade(&self, id: K) -> Result<Option<Rc<E>>> {
        Ok(self.get(id)?.upgrade())
    }
}

impl<K: Identity, T> Default for IdentityRegistry<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of interactors, resolving to whatever handle the game uses.
pub type InteractorRegistry<T> = IdentityRegistry<InteractorId, T>;

// =============================================================================
// Tests
// =============================================================================
