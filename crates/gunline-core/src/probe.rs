//! Line-of-sight probing.
//!
//! The resolver does not know how the world stores geometry; it asks a
//! [`SpatialProbe`] for the first obstruction along a direction. The
//! [`sightline::Space`] implementation maps collider owners to targets.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sightline::{LayerMask, Ray, Space};

use crate::target::TargetId;

/// First obstruction found by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeHit {
    /// Target owning the obstruction, `None` for level geometry
    pub target: Option<TargetId>,
    /// Distance from the probe origin
    pub distance: f32,
    /// World-space contact point
    pub point: Vec3,
}

impl ProbeHit {
    /// Returns `true` if the obstruction belongs to `target`.
    #[must_use]
    pub fn is(&self, target: TargetId) -> bool {
        self.target == Some(target)
    }
}

/// Ray-cast service used for line-of-sight checks.
pub trait SpatialProbe {
    /// Nearest obstruction on `layers` along `direction`, within
    /// `max_distance` of `origin`.
    fn probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<ProbeHit>;
}

impl SpatialProbe for Space {
    fn probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<ProbeHit> {
        self.raycast(&Ray::new(origin, direction), max_distance, layers)
            .map(|hit| ProbeHit {
                target: hit.owner.map(TargetId::new),
                distance: hit.distance,
                point: hit.point,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightline::{Collider, Shape};

    #[test]
    fn space_probe_reports_owner() {
        let mut space = Space::new();
        space
            .insert(
                Collider::new(Shape::sphere(Vec3::new(0.0, 0.0, 10.0), 0.5), LayerMask::ENEMY)
                    .with_owner(4),
            )
            .unwrap();

        let hit = space
            .probe(Vec3::ZERO, Vec3::Z, 30.0, LayerMask::SHOT_BLOCKERS)
            .unwrap();
        assert!(hit.is(TargetId::new(4)));
        assert!(!hit.is(TargetId::new(5)));
        assert!((hit.distance - 9.5).abs() < 1e-5);
    }

    #[test]
    fn space_probe_reports_geometry_without_target() {
        let mut space = Space::new();
        space
            .insert(Collider::new(
                Shape::box_min_max(Vec3::new(-1.0, -1.0, 3.0), Vec3::new(1.0, 1.0, 4.0)),
                LayerMask::ENVIRONMENT,
            ))
            .unwrap();

        let hit = space
            .probe(Vec3::ZERO, Vec3::Z * 2.0, 30.0, LayerMask::SHOT_BLOCKERS)
            .unwrap();
        assert_eq!(hit.target, None);
    }

    #[test]
    fn space_probe_misses_empty_space() {
        let space = Space::new();
        assert!(space
            .probe(Vec3::ZERO, Vec3::Z, 30.0, LayerMask::ALL)
            .is_none());
    }
}
