//! Collider storage and spatial queries.
//!
//! [`Space`] is a flat, id-ordered collider store. Queries walk every
//! collider in id order, so results (and tie-breaks) are deterministic across
//! runs and platforms. Levels in this game hold tens of colliders near a
//! weapon, not thousands, so no acceleration structure is kept.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SpaceError;
use crate::layer::LayerMask;
use crate::ray::{Ray, RayHit};
use crate::shape::Shape;
use crate::Bounds;

/// Identifier of a collider inside a [`Space`].
///
/// Ids are handed out in increasing order and never reused within a space.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColliderId(u64);

impl ColliderId {
    /// Creates a `ColliderId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColliderId({})", self.0)
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shape placed on a collision layer, optionally tagged with the id of the
/// game entity that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// World-space shape
    pub shape: Shape,
    /// Layer the collider sits on
    pub layer: LayerMask,
    /// Owning entity, if any (walls usually have none)
    pub owner: Option<u64>,
}

impl Collider {
    /// Create an unowned collider.
    #[must_use]
    pub fn new(shape: Shape, layer: LayerMask) -> Self {
        Self {
            shape,
            layer,
            owner: None,
        }
    }

    /// Tag the collider with an owning entity id.
    #[must_use]
    pub fn with_owner(mut self, owner: u64) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Deterministic collider store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Space {
    colliders: BTreeMap<ColliderId, Collider>,
    next_id: u64,
}

impl Space {
    /// Create an empty space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collider.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::InvalidShape`] if the shape has a non-finite
    /// coordinate or a non-positive extent.
    pub fn insert(&mut self, collider: Collider) -> Result<ColliderId, SpaceError> {
        if !collider.shape.is_valid() {
            return Err(SpaceError::InvalidShape(format!("{:?}", collider.shape)));
        }
        let id = ColliderId(self.next_id);
        self.next_id += 1;
        self.colliders.insert(id, collider);
        Ok(id)
    }

    /// Remove a collider, returning it if it was present.
    pub fn remove(&mut self, id: ColliderId) -> Option<Collider> {
        self.colliders.remove(&id)
    }

    /// Remove every collider tagged with `owner`. Returns how many were removed.
    pub fn remove_owner(&mut self, owner: u64) -> usize {
        let before = self.colliders.len();
        self.colliders.retain(|_, c| c.owner != Some(owner));
        before - self.colliders.len()
    }

    /// Look up a collider.
    #[must_use]
    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    /// Replace the shape of an existing collider (e.g. after the owner moved).
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::UnknownCollider`] if `id` is not registered and
    /// [`SpaceError::InvalidShape`] if the new shape is malformed.
    pub fn set_shape(&mut self, id: ColliderId, shape: Shape) -> Result<(), SpaceError> {
        if !shape.is_valid() {
            return Err(SpaceError::InvalidShape(format!("{shape:?}")));
        }
        let collider = self
            .colliders
            .get_mut(&id)
            .ok_or(SpaceError::UnknownCollider(id))?;
        collider.shape = shape;
        Ok(())
    }

    /// Number of registered colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Returns `true` if no colliders are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Iterate colliders in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &Collider)> {
        self.colliders.iter().map(|(id, c)| (*id, c))
    }

    /// Cast a ray and return the nearest collider on `mask` within
    /// `max_distance`.
    ///
    /// Equal distances resolve to the lowest collider id. A degenerate ray
    /// never hits.
    #[must_use]
    pub fn raycast(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        if ray.is_degenerate() || max_distance.is_nan() || max_distance <= 0.0 {
            return None;
        }

        let mut nearest: Option<RayHit> = None;
        for (id, collider) in &self.colliders {
            if !collider.layer.intersects(mask) {
                continue;
            }
            let Some(distance) = collider
                .shape
                .ray_distance(ray.origin, ray.direction, max_distance)
            else {
                continue;
            };
            if nearest.is_some_and(|hit| distance >= hit.distance) {
                continue;
            }
            nearest = Some(RayHit {
                collider: *id,
                owner: collider.owner,
                layer: collider.layer,
                distance,
                point: ray.at(distance),
            });
        }

        match &nearest {
            Some(hit) => tracing::trace!(
                collider = %hit.collider,
                distance = hit.distance,
                "raycast hit"
            ),
            None => tracing::trace!(?ray, max_distance, "raycast miss"),
        }
        nearest
    }

    /// Colliders on `mask` whose shape intersects `bounds`, in id order.
    #[must_use]
    pub fn overlapping(&self, bounds: &Bounds, mask: LayerMask) -> Vec<ColliderId> {
        self.colliders
            .iter()
            .filter(|(_, c)| c.layer.intersects(mask) && c.shape.intersects(bounds))
            .map(|(id, _)| *id)
            .collect()
    }
}
