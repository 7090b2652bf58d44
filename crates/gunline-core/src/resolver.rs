//! Hit-scan shot resolution.
//!
//! The `ShotResolver` turns one trigger pull into damage:
//! - Probe a line of sight from the muzzle to each tracked target
//! - Count a hit only if the first obstruction is that very target
//! - Apply the profile's damage payload to every counted hit
//!
//! # Stop-at-first-hit
//!
//! Single-target weapons stop after the first connecting target in tracking
//! order. Spread weapons (shotgun-class) keep going and damage every target
//! with a clear line of sight.
//!
//! # Projectile weapons
//!
//! Profiles with a projectile never resolve here: the shot becomes a
//! projectile launch and the resolver returns no hits.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::probe::SpatialProbe;
use crate::profile::{DamagePayload, WeaponProfile};
use crate::target::{TargetId, TargetWorld};

/// A target that took damage from a shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitResult {
    /// Target that was hit
    pub target: TargetId,
    /// Distance from the muzzle to the contact point
    pub distance: f32,
    /// World-space contact point
    pub point: Vec3,
    /// Damage applied
    pub damage: DamagePayload,
}

/// Resolver for hit-scan shots.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use glam::Vec3;
/// use gunline_core::profile::WeaponProfile;
/// use gunline_core::resolver::ShotResolver;
/// use gunline_core::target::{Combatant, TargetId};
/// use sightline::{Collider, LayerMask, Shape, Space};
///
/// let target = TargetId::new(1);
/// let mut space = Space::new();
/// space
///     .insert(Collider::new(Shape::sphere(Vec3::Z * 10.0, 0.5), LayerMask::ENEMY).with_owner(1))
///     .unwrap();
/// let mut world = BTreeMap::new();
/// world.insert(target, Combatant::new(Vec3::Z * 10.0, 50.0));
///
/// let hits = ShotResolver::new().resolve(
///     Vec3::ZERO,
///     &[target],
///     &WeaponProfile::default(),
///     &space,
///     &mut world,
/// );
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].target, target);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ShotResolver;

impl ShotResolver {
    /// Creates a new shot resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve one shot fired from `origin` against `targets`, in order.
    ///
    /// Dead or unknown targets, and targets sitting exactly at the muzzle,
    /// are skipped. Never fails; a shot that connects with nothing returns an
    /// empty vector.
    pub fn resolve(
        &self,
        origin: Vec3,
        targets: &[TargetId],
        profile: &WeaponProfile,
        probe: &dyn SpatialProbe,
        world: &mut dyn TargetWorld,
    ) -> Vec<HitResult> {
        let mut hits = Vec::new();
        if !profile.is_hitscan() {
            return hits;
        }

        let max_distance = profile.probe_distance();
        for &id in targets {
            let Some(target) = world.target_mut(id) else {
                continue;
            };
            if target.is_dead() {
                continue;
            }

            let direction = target.position() - origin;
            if direction.length_squared() <= f32::EPSILON {
                continue;
            }

            let Some(hit) = probe.probe(origin, direction, max_distance, profile.probe_layers)
            else {
                tracing::trace!(target_id = %id, "probe found nothing");
                continue;
            };
            if !hit.is(id) {
                tracing::trace!(target_id = %id, blocker = ?hit.target, "line of sight blocked");
                continue;
            }

            target.apply_damage(&profile.damage);
            hits.push(HitResult {
                target: id,
                distance: hit.distance,
                point: hit.point,
                damage: profile.damage,
            });
            tracing::debug!(target_id = %id, distance = hit.distance, "shot connected");

            if !profile.spread {
                break;
            }
        }

        hits
    }
}
