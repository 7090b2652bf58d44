//! Targets: things a weapon can damage.
//!
//! Targets belong to the game world. The weapon only ever holds their
//! [`TargetId`] and reaches them through a [`TargetWorld`] borrowed for the
//! duration of a tick.
//!
//! - [`Damageable`]: position, dead flag and damage intake of one target
//! - [`TargetWorld`]: id → target lookup
//! - [`Combatant`]: a stock hit-point target

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::profile::DamagePayload;

/// Identifier of a target in the game world.
///
/// `TargetId` shares its numeric space with collider owner tags, so a ray
/// hit on a collider owned by `7` is a hit on `TargetId::new(7)`.
///
/// # Example
///
/// ```
/// use gunline_core::target::TargetId;
///
/// let imp = TargetId::new(7);
/// assert_eq!(imp.as_u64(), 7);
/// assert_eq!(TargetId::from(7), imp);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetId(u64);

impl TargetId {
    /// Creates a new `TargetId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetId({})", self.0)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TargetId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<TargetId> for u64 {
    fn from(id: TargetId) -> Self {
        id.0
    }
}

/// Something that can be shot.
pub trait Damageable {
    /// World-space aim point.
    fn position(&self) -> Vec3;

    /// Returns `true` once the target can no longer take damage.
    fn is_dead(&self) -> bool;

    /// Apply one hit. Must be a no-op on a dead target.
    fn apply_damage(&mut self, payload: &DamagePayload);
}

/// Lookup from [`TargetId`] to the live target.
pub trait TargetWorld {
    /// Borrow a target.
    fn target(&self, id: TargetId) -> Option<&dyn Damageable>;

    /// Mutably borrow a target.
    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn Damageable>;

    /// Returns `true` if the target exists and is alive.
    fn is_alive(&self, id: TargetId) -> bool {
        self.target(id).is_some_and(|t| !t.is_dead())
    }
}

impl<T: Damageable> TargetWorld for BTreeMap<TargetId, T> {
    fn target(&self, id: TargetId) -> Option<&dyn Damageable> {
        self.get(&id).map(|t| t as &dyn Damageable)
    }

    fn target_mut(&mut self, id: TargetId) -> Option<&mut dyn Damageable> {
        self.get_mut(&id).map(|t| t as &mut dyn Damageable)
    }
}

/// Hit-point target: an imp, a zombieman, an exploding barrel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Aim point
    pub position: Vec3,
    /// Current hit points
    pub hp: f32,
    /// Hit points at spawn
    pub max_hp: f32,
    /// Accumulated knockback impulse
    pub knockback: f32,
    /// Number of hits taken while alive
    pub hits_taken: u32,
}

impl Combatant {
    /// Spawn a combatant at full health.
    #[must_use]
    pub fn new(position: Vec3, max_hp: f32) -> Self {
        Self {
            position,
            hp: max_hp,
            max_hp,
            knockback: 0.0,
            hits_taken: 0,
        }
    }
}

impl Damageable for Combatant {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    fn apply_damage(&mut self, payload: &DamagePayload) {
        if self.is_dead() {
            return;
        }
        self.hp -= payload.amount;
        self.knockback += payload.knockback;
        self.hits_taken += 1;
        if self.hp <= 0.0 {
            self.hp = 0.0;
            tracing::debug!(position = ?self.position, "combatant killed");
        }
    }
}
