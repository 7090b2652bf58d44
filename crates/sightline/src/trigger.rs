//! Trigger volumes: enter/exit notifications for a box attached to a weapon.
//!
//! A weapon's detection volume is a thin box in front of the muzzle:
//! `1 × vertical_range × range`, centered `range / 2` ahead along local +Z.
//! Each [`TriggerVolume::update`] compares the owners currently overlapping
//! the box against the previous update and reports the difference.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use sightline::{Collider, LayerMask, Shape, Space, TriggerEvent, TriggerVolume};
//!
//! let mut space = Space::new();
//! space
//!     .insert(Collider::new(Shape::sphere(Vec3::new(0.0, 0.0, 5.0), 0.5), LayerMask::ENEMY).with_owner(3))
//!     .unwrap();
//!
//! let mut volume = TriggerVolume::for_weapon(20.0, 20.0, LayerMask::ENEMY);
//! assert_eq!(volume.update(&space), vec![TriggerEvent::Enter(3)]);
//! assert!(volume.update(&space).is_empty());
//! ```

use std::collections::BTreeSet;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::layer::LayerMask;
use crate::shape::Shape;
use crate::space::Space;
use crate::Bounds;

/// Membership change reported by a [`TriggerVolume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    /// Owner started overlapping the volume
    Enter(u64),
    /// Owner stopped overlapping the volume (or its colliders were removed)
    Exit(u64),
}

impl TriggerEvent {
    /// Owner id carried by the event.
    #[must_use]
    pub const fn owner(&self) -> u64 {
        match self {
            Self::Enter(owner) | Self::Exit(owner) => *owner,
        }
    }
}

/// Box-shaped sensor in a local frame, tracking which owners overlap it.
///
/// Sphere colliders are tested exactly against the oriented box. Box
/// colliders are tested against the volume's world-space bounding box, which
/// over-reports near the corners of a rotated volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerVolume {
    local: Bounds,
    position: Vec3,
    rotation: Quat,
    mask: LayerMask,
    inside: BTreeSet<u64>,
}

impl TriggerVolume {
    /// Create a volume from local-space bounds.
    #[must_use]
    pub fn new(local: Bounds, mask: LayerMask) -> Self {
        Self {
            local,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            mask,
            inside: BTreeSet::new(),
        }
    }

    /// Create the detection volume for a weapon with the given horizontal
    /// reach and vertical extent.
    #[must_use]
    pub fn for_weapon(range: f32, vertical_range: f32, mask: LayerMask) -> Self {
        let local = Bounds::from_center_size(
            Vec3::new(0.0, 0.0, range * 0.5),
            Vec3::new(1.0, vertical_range, range),
        );
        Self::new(local, mask)
    }

    /// Move the volume (typically to the wielder's muzzle and facing).
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
    }

    /// Local-space bounds of the volume.
    #[must_use]
    pub fn local_bounds(&self) -> Bounds {
        self.local
    }

    /// World-space position of the volume's frame.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Layer mask the volume listens to.
    #[must_use]
    pub fn mask(&self) -> LayerMask {
        self.mask
    }

    /// Axis-aligned world bounds enclosing the rotated volume.
    #[must_use]
    pub fn world_bounds(&self) -> Bounds {
        let (lo, hi) = (self.local.min, self.local.max);
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            let world = self.position + self.rotation * corner;
            min = min.min(world);
            max = max.max(world);
        }
        Bounds::from_min_max(min, max)
    }

    /// Returns `true` if `owner` overlapped the volume at the last update.
    #[must_use]
    pub fn contains(&self, owner: u64) -> bool {
        self.inside.contains(&owner)
    }

    /// Forget all occupants without emitting exit events.
    pub fn reset(&mut self) {
        self.inside.clear();
    }

    /// Recompute occupancy against `space` and return the changes.
    ///
    /// Exits are reported before enters; within each group owners are in
    /// ascending order. Colliders without an owner are ignored.
    pub fn update(&mut self, space: &Space) -> Vec<TriggerEvent> {
        let world_bounds = self.world_bounds();
        let inverse = self.rotation.inverse();

        let current: BTreeSet<u64> = space
            .overlapping(&world_bounds, self.mask)
            .into_iter()
            .filter_map(|id| space.get(id))
            .filter_map(|c| {
                let owner = c.owner?;
                let overlaps = match c.shape {
                    Shape::Sphere { center, radius } => {
                        let local_center = inverse * (center - self.position);
                        self.local.intersects_sphere(local_center, radius)
                    }
                    Shape::Box { bounds } => bounds.intersects(&world_bounds),
                };
                overlaps.then_some(owner)
            })
            .collect();

        let mut events: Vec<TriggerEvent> = self
            .inside
            .difference(&current)
            .map(|owner| TriggerEvent::Exit(*owner))
            .collect();
        events.extend(
            current
                .difference(&self.inside)
                .map(|owner| TriggerEvent::Enter(*owner)),
        );

        for event in &events {
            tracing::debug!(?event, "trigger volume membership changed");
        }

        self.inside = current;
        events
    }
}
