//! The weapon: tracker, resolver and timing wired together.
//!
//! `WeaponController` runs once per game tick:
//!
//! 1. **TIMERS**: run timers that came due during the tick, in time order.
//!    A scheduled burst shot fires at its due time, not at the tick boundary.
//! 2. **INTENT**: sample the fire action and ask the timing controller
//!    whether a new burst may start.
//! 3. **FIRE**: for each permitted shot, prune dead targets, resolve hits
//!    (or launch a projectile), spend one round and notify collaborators.
//!
//! Nothing here fails at fire time: a weapon with no profile, no ammo or
//! that is disabled simply does nothing for the tick.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::time::Duration;
//! use glam::{Quat, Vec3};
//! use gunline_core::controller::{ShotKind, TickContext, WeaponController};
//! use gunline_core::effects::WeaponEffects;
//! use gunline_core::profile::WeaponProfile;
//! use gunline_core::target::{Combatant, TargetId};
//! use gunline_core::timing::FireIntent;
//! use sightline::{Collider, LayerMask, Shape, Space};
//!
//! let mut space = Space::new();
//! space
//!     .insert(Collider::new(Shape::sphere(Vec3::Z * 10.0, 0.5), LayerMask::ENEMY).with_owner(1))
//!     .unwrap();
//! let mut world = BTreeMap::new();
//! world.insert(TargetId::new(1), Combatant::new(Vec3::Z * 10.0, 30.0));
//!
//! let mut weapon = WeaponController::new(WeaponEffects::default());
//! weapon.equip(WeaponProfile::default()).unwrap();
//! weapon.scan_range(&space, Vec3::ZERO, Quat::IDENTITY, &world);
//!
//! let intent = FireIntent::press();
//! let shots = weapon.tick(&mut TickContext {
//!     dt: Duration::from_millis(16),
//!     intent: &intent,
//!     origin: Vec3::ZERO,
//!     rotation: Quat::IDENTITY,
//!     probe: &space,
//!     world: &mut world,
//! });
//!
//! assert_eq!(shots.len(), 1);
//! assert!(matches!(&shots[0].kind, ShotKind::Hitscan(hits) if hits.len() == 1));
//! assert_eq!(weapon.ammo(), 49);
//! ```

use std::time::Duration;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use sightline::{Space, TriggerEvent, TriggerVolume};

use crate::effects::WeaponEffects;
use crate::error::ConfigError;
use crate::probe::SpatialProbe;
use crate::profile::WeaponProfile;
use crate::resolver::{HitResult, ShotResolver};
use crate::target::TargetWorld;
use crate::timing::{
    FireIntent, FirePermit, FireState, FireTimingController, IntentSource, TimingConfig,
    DEFAULT_FIRE_ACTION,
};
use crate::tracker::TargetTracker;

// =============================================================================
// Tick input / output
// =============================================================================

/// Everything a weapon borrows from the game for one tick.
pub struct TickContext<'a> {
    /// Time elapsed since the previous tick
    pub dt: Duration,
    /// Trigger input
    pub intent: &'a dyn IntentSource,
    /// Muzzle position; line-of-sight probes start here
    pub origin: Vec3,
    /// Weapon orientation; `rotation * Vec3::Z` is forward
    pub rotation: Quat,
    /// Line-of-sight service
    pub probe: &'a dyn SpatialProbe,
    /// Targets that can be damaged
    pub world: &'a mut dyn TargetWorld,
}

/// Outcome of one shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShotKind {
    /// Hits resolved instantly; empty if the shot connected with nothing
    Hitscan(Vec<HitResult>),
    /// Projectile handed to the launcher
    Projectile {
        /// Spawn position
        origin: Vec3,
        /// Unit launch direction
        direction: Vec3,
    },
}

/// One shot fired by a weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    /// Weapon clock at the moment of the shot
    pub at: Duration,
    /// Position of this shot within its burst, starting at 1
    pub shot_in_burst: u32,
    /// Rounds left after the shot
    pub ammo_remaining: u32,
    /// What the shot did
    pub kind: ShotKind,
}

impl ShotEvent {
    /// Hits of a hit-scan shot; empty for projectiles.
    #[must_use]
    pub fn hits(&self) -> &[HitResult] {
        match &self.kind {
            ShotKind::Hitscan(hits) => hits,
            ShotKind::Projectile { .. } => &[],
        }
    }
}

// =============================================================================
// WeaponController
// =============================================================================

/// A single weapon's firing state machine.
#[derive(Debug)]
pub struct WeaponController {
    profile: Option<WeaponProfile>,
    timing: FireTimingController,
    tracker: TargetTracker,
    resolver: ShotResolver,
    detection: Option<TriggerVolume>,
    effects: WeaponEffects,
    spawn_point: Option<Vec3>,
    action: String,
    enabled: bool,
}

impl WeaponController {
    /// Creates an enabled weapon with nothing equipped.
    #[must_use]
    pub fn new(effects: WeaponEffects) -> Self {
        Self {
            profile: None,
            timing: FireTimingController::default(),
            tracker: TargetTracker::new(),
            resolver: ShotResolver::new(),
            detection: None,
            effects,
            spawn_point: None,
            action: DEFAULT_FIRE_ACTION.to_string(),
            enabled: true,
        }
    }

    /// Set the projectile spawn point, in the weapon's local frame.
    #[must_use]
    pub fn with_spawn_point(mut self, local: Vec3) -> Self {
        self.spawn_point = Some(local);
        self
    }

    /// Read the trigger from `action` instead of `"Fire1"`.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Equip a profile, replacing any previous one.
    ///
    /// Timing resets to `Idle` and the detection volume is rebuilt for the
    /// new reach, so tracked targets are forgotten until the next
    /// [`scan_range`](Self::scan_range).
    ///
    /// # Errors
    ///
    /// Any [`WeaponProfile::validate`] error, or
    /// [`ConfigError::MissingSpawnPoint`] for a projectile weapon on a
    /// controller without a spawn point. On error the weapon is unchanged.
    pub fn equip(&mut self, profile: WeaponProfile) -> Result<(), ConfigError> {
        if let Err(err) = self.check(&profile) {
            tracing::warn!(weapon = %profile.name, error = %err, "rejected weapon profile");
            return Err(err);
        }

        self.timing.configure(TimingConfig::from_profile(&profile));
        self.tracker.clear();
        self.detection = Some(profile.detection_volume());
        tracing::debug!(weapon = %profile.name, kind = %profile.kind, ammo = profile.ammo, "weapon equipped");
        self.effects.observer.on_ammo_changed(profile.ammo);
        self.profile = Some(profile);
        Ok(())
    }

    fn check(&self, profile: &WeaponProfile) -> Result<(), ConfigError> {
        profile.validate()?;
        if profile.projectile.is_some() && self.spawn_point.is_none() {
            return Err(ConfigError::MissingSpawnPoint(profile.name.clone()));
        }
        Ok(())
    }

    /// Holster the weapon. Returns the profile, with its remaining ammo.
    pub fn unequip(&mut self) -> Option<WeaponProfile> {
        self.timing.reset();
        self.tracker.clear();
        self.detection = None;
        let profile = self.profile.take();
        if let Some(p) = &profile {
            tracing::debug!(weapon = %p.name, ammo = p.ammo, "weapon unequipped");
        }
        profile
    }

    /// Enable or disable the weapon. Disabling cancels any burst in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.timing.reset();
        }
        tracing::debug!(enabled, "weapon enabled changed");
    }

    /// Returns `true` if the weapon is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Add rounds to the magazine. Cancels any burst in progress.
    ///
    /// No-op without a profile.
    pub fn replenish_ammo(&mut self, rounds: u32) {
        let Some(profile) = self.profile.as_mut() else {
            tracing::trace!("replenish ignored, nothing equipped");
            return;
        };
        profile.ammo = profile.ammo.saturating_add(rounds);
        let ammo = profile.ammo;
        self.timing.reset();
        tracing::debug!(rounds, ammo, "ammo replenished");
        self.effects.observer.on_ammo_changed(ammo);
    }

    /// Rounds left, zero without a profile.
    #[must_use]
    pub fn ammo(&self) -> u32 {
        self.profile.as_ref().map_or(0, |p| p.ammo)
    }

    /// Current firing phase.
    #[must_use]
    pub fn state(&self) -> FireState {
        self.timing.state()
    }

    /// Weapon clock.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.timing.now()
    }

    /// Equipped profile.
    #[must_use]
    pub fn profile(&self) -> Option<&WeaponProfile> {
        self.profile.as_ref()
    }

    /// Targets in range.
    #[must_use]
    pub fn tracker(&self) -> &TargetTracker {
        &self.tracker
    }

    /// Mutable access to the tracker, for games that run their own
    /// detection instead of [`scan_range`](Self::scan_range).
    pub fn tracker_mut(&mut self) -> &mut TargetTracker {
        &mut self.tracker
    }

    /// Detection volume of the equipped profile.
    #[must_use]
    pub fn detection(&self) -> Option<&TriggerVolume> {
        self.detection.as_ref()
    }

    /// Feed one enter/exit event from an external trigger into the tracker.
    pub fn handle_trigger(&mut self, event: TriggerEvent, world: &dyn TargetWorld) {
        self.tracker.apply(event, world);
    }

    /// Move the detection volume to the weapon's pose, diff it against
    /// `space` and feed the resulting events into the tracker.
    ///
    /// Returns the events. Empty without a profile.
    pub fn scan_range(
        &mut self,
        space: &Space,
        position: Vec3,
        rotation: Quat,
        world: &dyn TargetWorld,
    ) -> Vec<TriggerEvent> {
        let Some(volume) = self.detection.as_mut() else {
            return Vec::new();
        };
        volume.set_pose(position, rotation);
        let events = volume.update(space);
        for event in &events {
            self.tracker.apply(*event, world);
        }
        events
    }

    /// Advance the weapon by one tick and return the shots it fired.
    pub fn tick(&mut self, ctx: &mut TickContext<'_>) -> Vec<ShotEvent> {
        let until = self.timing.now() + ctx.dt;
        let mut shots = Vec::new();

        if !self.enabled {
            self.timing.advance_to(until);
            return shots;
        }
        let Some(hold_to_fire) = self.profile.as_ref().map(|p| p.hold_to_fire) else {
            tracing::trace!("no profile equipped, not firing");
            self.timing.advance_to(until);
            return shots;
        };

        // TIMERS: scheduled burst shots fire at their due time
        loop {
            let ammo = self.ammo();
            if self.timing.poll(until, ammo).is_none() {
                break;
            }
            shots.extend(self.fire(ctx));
        }
        self.timing.advance_to(until);

        // INTENT: start a new burst
        let intent = FireIntent::sample(ctx.intent, &self.action);
        let ammo = self.ammo();
        match self.timing.request_fire(intent.satisfied(hold_to_fire), ammo) {
            FirePermit::Granted => shots.extend(self.fire(ctx)),
            // Edge-triggered so a held trigger clicks once
            FirePermit::OutOfAmmo if intent.pressed => {
                tracing::trace!("dry fire");
                self.effects.observer.on_dry_fire();
            }
            FirePermit::OutOfAmmo | FirePermit::Denied => {}
        }

        shots
    }

    /// Fire one shot at the current clock.
    fn fire(&mut self, ctx: &mut TickContext<'_>) -> Option<ShotEvent> {
        let profile = self.profile.as_mut()?;
        if profile.ammo == 0 {
            return None;
        }

        let kind = if let Some(spec) = &profile.projectile {
            let origin = ctx.origin + ctx.rotation * self.spawn_point.unwrap_or(Vec3::ZERO);
            let direction = (ctx.rotation * Vec3::Z).normalize_or_zero();
            self.effects.launcher.launch(spec, origin, direction);
            ShotKind::Projectile { origin, direction }
        } else {
            self.tracker.prune(&*ctx.world);
            ShotKind::Hitscan(self.resolver.resolve(
                ctx.origin,
                self.tracker.current_targets(),
                profile,
                ctx.probe,
                &mut *ctx.world,
            ))
        };

        profile.ammo -= 1;
        let event = ShotEvent {
            at: self.timing.now(),
            shot_in_burst: self.timing.shots_fired_in_burst() + 1,
            ammo_remaining: profile.ammo,
            kind,
        };
        self.timing.record_shot(profile.ammo);

        if let Some(clip) = &profile.fire_sound {
            self.effects.audio.play(clip, ctx.origin);
        }
        tracing::debug!(
            weapon = %profile.name,
            at = ?event.at,
            shot_in_burst = event.shot_in_burst,
            hits = event.hits().len(),
            ammo = event.ammo_remaining,
            "shot fired"
        );
        self.effects.observer.on_shot(&event);
        self.effects.observer.on_ammo_changed(event.ammo_remaining);

        Some(event)
    }
}
