//! Collision layers.
//!
//! Every collider sits on one or more layers; ray casts and trigger volumes
//! carry a mask and only see colliders whose layer intersects it.
//!
//! | Bit | Layer         | Typical use                        |
//! |-----|---------------|------------------------------------|
//! | 0   | `DEFAULT`     | Untagged props                     |
//! | 1   | `PLAYER`      | The wielder's own body             |
//! | 2   | `ENEMY`       | Damageable hostiles                |
//! | 3   | `ENVIRONMENT` | Walls, doors, static obstacles     |
//! | 4   | `PROJECTILE`  | In-flight rockets and plasma balls |

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Bit set of collision layers.
    ///
    /// # Example
    ///
    /// ```
    /// use sightline::LayerMask;
    ///
    /// let shot_mask = LayerMask::ENEMY | LayerMask::ENVIRONMENT;
    /// assert!(shot_mask.intersects(LayerMask::ENEMY));
    /// assert!(!shot_mask.intersects(LayerMask::PLAYER));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct LayerMask: u32 {
        /// Untagged colliders.
        const DEFAULT = 1 << 0;
        /// The player (wielder) body.
        const PLAYER = 1 << 1;
        /// Hostile, damageable entities.
        const ENEMY = 1 << 2;
        /// Static level geometry.
        const ENVIRONMENT = 1 << 3;
        /// In-flight projectiles.
        const PROJECTILE = 1 << 4;
        /// Every layer.
        const ALL = u32::MAX;
    }
}

impl LayerMask {
    /// The mask hit-scan probes use by default: anything that can either take
    /// damage or block a shot.
    pub const SHOT_BLOCKERS: Self = Self::ENEMY.union(Self::ENVIRONMENT).union(Self::DEFAULT);
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}
