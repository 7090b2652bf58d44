//! Collider shapes.
//!
//! Shapes are stored in world space. Spheres stand in for creatures, boxes
//! for walls and doors.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Bounds;

/// Collision shape of a collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Sphere defined by center and radius
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box
    Box { bounds: Bounds },
}

impl Shape {
    /// Create a sphere shape.
    #[must_use]
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere { center, radius }
    }

    /// Create a box shape from bounds.
    #[must_use]
    pub fn aabb(bounds: Bounds) -> Self {
        Self::Box { bounds }
    }

    /// Create a box shape from min/max corners.
    #[must_use]
    pub fn box_min_max(min: Vec3, max: Vec3) -> Self {
        Self::aabb(Bounds::from_min_max(min, max))
    }

    /// Get the bounding box of this shape.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            Shape::Sphere { center, radius } => Bounds::from_min_max(
                *center - Vec3::splat(*radius),
                *center + Vec3::splat(*radius),
            ),
            Shape::Box { bounds } => *bounds,
        }
    }

    /// Representative point of the shape (sphere center or box center).
    #[must_use]
    pub fn center(&self) -> Vec3 {
        match self {
            Shape::Sphere { center, .. } => *center,
            Shape::Box { bounds } => bounds.center(),
        }
    }

    /// Check if a point is inside this shape.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        match self {
            Shape::Sphere { center, radius } => center.distance(point) <= *radius,
            Shape::Box { bounds } => bounds.contains(point),
        }
    }

    /// Check if this shape intersects a bounds.
    #[must_use]
    pub fn intersects(&self, bounds: &Bounds) -> bool {
        match self {
            Shape::Sphere { center, radius } => bounds.intersects_sphere(*center, *radius),
            Shape::Box { bounds: b } => b.intersects(bounds),
        }
    }

    /// Distance along a ray at which it first touches this shape.
    ///
    /// `direction` must be normalized. An origin inside the shape reports
    /// `Some(0.0)`.
    #[must_use]
    pub fn ray_distance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        match self {
            Shape::Sphere { center, radius } => {
                let oc = origin - *center;
                let c = oc.length_squared() - radius * radius;
                if c <= 0.0 {
                    return Some(0.0);
                }
                let b = oc.dot(direction);
                let discriminant = b * b - c;
                if discriminant < 0.0 {
                    return None;
                }
                let t = -b - discriminant.sqrt();
                (0.0..=max_distance).contains(&t).then_some(t)
            }
            Shape::Box { bounds } => bounds.ray_entry(origin, direction, max_distance),
        }
    }

    /// Returns `true` if the shape has finite, strictly positive extents.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self {
            Shape::Sphere { center, radius } => {
                center.is_finite() && radius.is_finite() && *radius > 0.0
            }
            Shape::Box { bounds } => bounds.is_valid(),
        }
    }
}
