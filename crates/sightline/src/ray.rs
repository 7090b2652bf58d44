//! Rays and ray-cast results.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::layer::LayerMask;
use crate::space::ColliderId;

/// A half-line from `origin` along a unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Unit direction, or zero for a degenerate ray
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// A zero or non-finite direction yields a degenerate ray that never
    /// hits anything.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Returns `true` if the direction could not be normalized.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }
}

/// Nearest obstruction found by a ray cast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Collider that was hit
    pub collider: ColliderId,
    /// Owner tag of the collider, if any
    pub owner: Option<u64>,
    /// Layer of the collider
    pub layer: LayerMask,
    /// Distance from the ray origin
    pub distance: f32,
    /// World-space contact point
    pub point: Vec3,
}
