//! Ray-based candidate acquisition.
//!
//! [`ProximityScanner`] is the bundled [`CandidateSupplier`]: it casts a view
//! ray against spheres placed around interactables and hands the nearest hits
//! to the solver.
//!
//! # Scan rules
//!
//! - With `scan_interval > 0`, a scan is skipped until that many ticks have
//!   passed since the last one. `0` scans every tick.
//! - Only placements on a layer in `layer_mask` are tested.
//! - A ray origin inside a sphere is a hit at distance 0.
//! - Hits beyond `range` are dropped; the rest are ordered nearest first,
//!   ties by placement order, and truncated to `max_candidates`.
//! - Placements whose entity has been dropped are pruned.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use interplay_core::entity::InteractableEntity;
//! use interplay_core::identity::InteractableId;
//! use interplay_core::interactor::CandidateSupplier;
//! use interplay_core::supplier::{ProximityScanner, ScannerConfig};
//!
//! let near = InteractableEntity::new(InteractableId::new(1), vec![]);
//! let far = InteractableEntity::new(InteractableId::new(2), vec![]);
//!
//! let mut scanner = ProximityScanner::new(ScannerConfig::default());
//! scanner.place(&far, Vec3::new(0.0, 0.0, 2.5), 0.5);
//! scanner.place(&near, Vec3::new(0.0, 0.0, 1.0), 0.5);
//! scanner.set_view(Vec3::ZERO, Vec3::Z);
//!
//! let hits = scanner.scan(0).unwrap();
//! let ids: Vec<_> = hits.iter().map(|e| e.id()).collect();
//! assert_eq!(ids, vec![near.id(), far.id()]);
//! ```

use std::fmt;
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::InteractableEntity;
use crate::interactor::CandidateSupplier;

// =============================================================================
// Layers
// =============================================================================

bitflags! {
    /// Layers a placement lives on and a scanner looks at.
    ///
    /// Any bit is a valid layer; only the first few are named.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct InteractionLayers: u32 {
        /// Layer used by [`ProximityScanner::place`].
        const DEFAULT = 1 << 0;
        /// Pickups and loose items.
        const ITEMS = 1 << 1;
        /// Doors, levers and other fixtures.
        const FIXTURES = 1 << 2;
        /// Characters that can be talked to.
        const CHARACTERS = 1 << 3;

        const _ = !0;
    }
}

impl Default for InteractionLayers {
    fn default() -> Self {
        Self::all()
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Settings for a [`ProximityScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerConfig {
    /// Maximum hit distance along the view ray.
    pub range: f32,
    /// Maximum number of candidates handed out per scan.
    pub max_candidates: usize,
    /// Ticks between scans. `0` scans every tick.
    pub scan_interval: u64,
    /// Layers considered by the scan.
    pub layer_mask: InteractionLayers,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            range: 3.0,
            max_candidates: 3,
            scan_interval: 0,
            layer_mask: InteractionLayers::all(),
        }
    }
}

// =============================================================================
// Proximity Scanner
// =============================================================================

struct Placement {
    entity: Weak<InteractableEntity>,
    center: Vec3,
    radius: f32,
    layers: InteractionLayers,
}

/// Candidate supplier casting a view ray against interactable spheres.
pub struct ProximityScanner {
    config: ScannerConfig,
    origin: Vec3,
    forward: Vec3,
    placements: Vec<Placement>,
    last_scan: Option<u64>,
}

impl ProximityScanner {
    /// Creates a scanner looking down +Z from the origin.
    #[must_use]
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            config,
            origin: Vec3::ZERO,
            forward: Vec3::Z,
            placements: Vec::new(),
            last_scan: None,
        }
    }

    /// Settings in use.
    #[must_use]
    pub const fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Places `entity` on the default layer. See [`ProximityScanner::place_on`].
    pub fn place(&mut self, entity: &Rc<InteractableEntity>, center: Vec3, radius: f32) {
        self.place_on(entity, center, radius, InteractionLayers::DEFAULT);
    }

    /// Places `entity` as a sphere at `center` on `layers`.
    ///
    /// Placing an entity again moves it; its position in tie-breaking order
    /// is kept.
    pub fn place_on(
        &mut self,
        entity: &Rc<InteractableEntity>,
        center: Vec3,
        radius: f32,
        layers: InteractionLayers,
    ) {
        let radius = radius.max(0.0);
        if let Some(existing) = self.placement_mut(entity) {
            existing.center = center;
            existing.radius = radius;
            existing.layers = layers;
            return;
        }

        self.placements.push(Placement {
            entity: Rc::downgrade(entity),
            center,
            radius,
            layers,
        });
    }

    /// Removes `entity`'s placement. Returns true if it was placed.
    pub fn remove(&mut self, entity: &Rc<InteractableEntity>) -> bool {
        let before = self.placements.len();
        self.placements
            .retain(|placement| !std::ptr::eq(placement.entity.as_ptr(), Rc::as_ptr(entity)));
        self.placements.len() != before
    }

    /// Number of placements, including ones whose entity was dropped since
    /// the last scan.
    #[must_use]
    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// Moves the view ray. `forward` is normalised; a zero vector hits only
    /// spheres containing `origin`.
    pub fn set_view(&mut self, origin: Vec3, forward: Vec3) {
        self.origin = origin;
        self.forward = forward.normalize_or_zero();
    }

    /// Tick of the last scan that ran.
    #[must_use]
    pub const fn last_scan(&self) -> Option<u64> {
        self.last_scan
    }

    fn placement_mut(&mut self, entity: &Rc<InteractableEntity>) -> Option<&mut Placement> {
        self.placements
            .iter_mut()
            .find(|placement| std::ptr::eq(placement.entity.as_ptr(), Rc::as_ptr(entity)))
    }

    fn throttled(&self, tick: u64) -> bool {
        let interval = self.config.scan_interval;
        interval > 0
            && self
                .last_scan
                .is_some_and(|last| tick.saturating_sub(last) < interval)
    }
}

impl CandidateSupplier for ProximityScanner {
    fn scan(&mut self, tick: u64) -> Option<Vec<Rc<InteractableEntity>>> {
        if self.throttled(tick) {
            return None;
        }
        self.last_scan = Some(tick);
        self.placements
            .retain(|placement| placement.entity.strong_count() > 0);

        let mut hits: Vec<(f32, Rc<InteractableEntity>)> = self
            .placements
            .iter()
            .filter(|placement| placement.layers.intersects(self.config.layer_mask))
            .filter_map(|placement| {
                let distance = ray_sphere(self.origin, self.forward, placement.center, placement.radius)?;
                // False for a NaN range, which then keeps nothing.
                let in_range = distance <= self.config.range;
                if !in_range {
                    return None;
                }
                Some((distance, placement.entity.upgrade()?))
            })
            .collect();

        hits.sort_by(|(a, _), (b, _)| a.total_cmp(b));
        hits.truncate(self.config.max_candidates);

        debug!(
            tick,
            placements = self.placements.len(),
            hits = hits.len(),
            "proximity scan"
        );
        Some(hits.into_iter().map(|(_, entity)| entity).collect())
    }
}

impl fmt::Debug for ProximityScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProximityScanner")
            .field("config", &self.config)
            .field("origin", &self.origin)
            .field("forward", &self.forward)
            .field("placements", &self.placements.len())
            .field("last_scan", &self.last_scan)
            .finish()
    }
}

/// Distance along a unit ray to the first hit on a sphere.
///
/// Returns `Some(0.0)` when `origin` is inside the sphere and `None` on a
/// miss or when the sphere lies behind the ray.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = offset.dot(direction);
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let distance = -b - discriminant.sqrt();
    (distance >= 0.0).then_some(distance)
}

// =============================================================================
// Tests
// =============================================================================
