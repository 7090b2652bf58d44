//! # Gunline Core
//!
//! Firing core for a single weapon: when may it shoot, what does the shot
//! hit, and what does it cost.
//!
//! ## Architecture
//!
//! - **[`TargetTracker`]**: ordered set of live targets inside the weapon's
//!   detection volume, fed by enter/exit events
//! - **[`ShotResolver`]**: line-of-sight hit resolution, stop-at-first-hit
//!   or spread
//! - **[`FireTimingController`]**: Idle / Firing / Cooldown state machine
//!   driven by a deterministic timer queue
//! - **[`WeaponController`]**: runs the above once per tick, spends ammo and
//!   reports to collaborators
//!
//! Everything outside the firing decision (audio, HUD, projectile spawning,
//! input, the game world itself) is reached through a trait:
//! [`IntentSource`], [`SpatialProbe`], [`TargetWorld`], [`AudioSink`],
//! [`WeaponObserver`], [`ProjectileLauncher`].
//!
//! ## Determinism
//!
//! Given the same profile, world and per-tick inputs, a weapon fires the same
//! shots at the same clock times and hits the same targets. Targets resolve
//! in tracking order, timers pop in `(due, sequence)` order and the spatial
//! substrate breaks ties by collider id.
//!
//! ## Usage
//!
//! ```
//! use gunline_core::{GunKind, WeaponController, WeaponEffects, WeaponProfile};
//!
//! let mut weapon = WeaponController::new(WeaponEffects::default());
//! weapon.equip(WeaponProfile::preset(GunKind::Shotgun)).unwrap();
//! assert_eq!(weapon.ammo(), 20);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export sightline for spatial setup
pub use sightline;

pub mod controller;
pub mod effects;
pub mod error;
pub mod probe;
pub mod profile;
pub mod resolver;
pub mod scheduler;
pub mod target;
pub mod timing;
pub mod tracker;

pub use controller::{ShotEvent, ShotKind, TickContext, WeaponController};
pub use effects::{AudioSink, ProjectileLauncher, Silent, WeaponEffects, WeaponObserver};
pub use error::ConfigError;
pub use probe::{ProbeHit, SpatialProbe};
pub use profile::{DamagePayload, GunKind, ProjectileSpec, WeaponProfile};
pub use resolver::{HitResult, ShotResolver};
pub use scheduler::{TimerHandle, TimerQueue};
pub use target::{Combatant, Damageable, TargetId, TargetWorld};
pub use timing::{FireIntent, FirePermit, FireState, FireTimingController, IntentSource, TimingConfig};
pub use tracker::TargetTracker;

#[cfg(test)]
mod tests;
