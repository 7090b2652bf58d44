//! # Sightline
//!
//! Spatial substrate for hit-scan weapons: collision layers, collider shapes,
//! ray casts and trigger volumes.
//!
//! Sightline keeps a flat, deterministic collider store ([`Space`]) and answers
//! the two questions a weapon asks of the world:
//!
//! - **Who is in front of me?** A [`TriggerVolume`] diffs the owners that
//!   overlap a box in the weapon's local frame and reports enter/exit events.
//! - **What do I hit first?** [`Space::raycast`] returns the nearest collider
//!   along a ray, filtered by a [`LayerMask`].
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec3;
//! use sightline::{Collider, LayerMask, Ray, Shape, Space};
//!
//! let mut space = Space::new();
//! let imp = space
//!     .insert(Collider::new(
//!         Shape::sphere(Vec3::new(0.0, 0.0, 10.0), 0.5),
//!         LayerMask::ENEMY,
//!     ).with_owner(7))
//!     .unwrap();
//!
//! let hit = space
//!     .raycast(&Ray::new(Vec3::ZERO, Vec3::Z), 30.0, LayerMask::ENEMY)
//!     .unwrap();
//! assert_eq!(hit.collider, imp);
//! assert_eq!(hit.owner, Some(7));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod layer;
pub mod ray;
pub mod shape;
pub mod space;
pub mod trigger;

// Re-exports for convenience
pub use error::SpaceError;
pub use layer::LayerMask;
pub use ray::{Ray, RayHit};
pub use shape::Shape;
pub use space::{Collider, ColliderId, Space};
pub use trigger::{TriggerEvent, TriggerVolume};

use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Create bounds from min/max corners.
    #[must_use]
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create bounds from a center point and full extents.
    #[must_use]
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Get the center of the bounds.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the bounds.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside the bounds.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if two bounds overlap (touching counts).
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Check if this bounds intersects a sphere.
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        center.distance_squared(closest) <= radius * radius
    }

    /// Distance along a ray at which it enters these bounds.
    ///
    /// `direction` must be normalized. Returns `Some(0.0)` when the origin is
    /// already inside, `None` when the ray misses or the entry point lies
    /// beyond `max_distance`.
    #[must_use]
    pub fn ray_entry(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut t_near = 0.0_f32;
        let mut t_far = max_distance;

        // Slab test, one axis at a time
        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t0 = (lo - o) * inv;
            let mut t1 = (hi - o) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        Some(t_near)
    }

    /// Returns `true` if every extent is finite and strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let size = self.size();
        self.min.is_finite() && self.max.is_finite() && size.cmpgt(Vec3::ZERO).all()
    }
}
