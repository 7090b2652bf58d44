//! Test helpers: a firing range with a weapon, targets and walls.
//!
//! The range keeps the spatial side ([`Space`]) and the damage side (a
//! `BTreeMap` world) in sync so tests only talk about enemies and walls.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use glam::{Quat, Vec3};
use sightline::{Collider, ColliderId, LayerMask, Shape, Space, TriggerEvent};

use crate::controller::{ShotEvent, TickContext, WeaponController};
use crate::effects::{AudioSink, ProjectileLauncher, WeaponEffects, WeaponObserver};
use crate::profile::{DamagePayload, ProjectileSpec, WeaponProfile};
use crate::target::{Combatant, Damageable, TargetId};
use crate::timing::FireIntent;

/// Radius of every test enemy.
pub const ENEMY_RADIUS: f32 = 0.5;

/// Local projectile spawn point of the test weapon.
pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 0.0, 0.5);

// =============================================================================
// Recording collaborators
// =============================================================================

/// Everything the weapon reported to its collaborators.
#[derive(Debug, Default)]
pub struct EffectLog {
    /// Clips played, in order
    pub clips: Vec<String>,
    /// Shots observed
    pub shots: Vec<ShotEvent>,
    /// Ammo counts observed
    pub ammo: Vec<u32>,
    /// Dry-fire notifications
    pub dry_fires: u32,
    /// Projectiles launched: (name, origin, direction)
    pub launches: Vec<(String, Vec3, Vec3)>,
}

/// Shared handle implementing every outbound collaborator.
#[derive(Debug, Clone, Default)]
pub struct Recorder(pub Rc<RefCell<EffectLog>>);

impl AudioSink for Recorder {
    fn play(&mut self, clip: &str, _position: Vec3) {
        self.0.borrow_mut().clips.push(clip.to_string());
    }
}

impl WeaponObserver for Recorder {
    fn on_shot(&mut self, event: &ShotEvent) {
        self.0.borrow_mut().shots.push(event.clone());
    }

    fn on_ammo_changed(&mut self, ammo: u32) {
        self.0.borrow_mut().ammo.push(ammo);
    }

    fn on_dry_fire(&mut self) {
        self.0.borrow_mut().dry_fires += 1;
    }
}

impl ProjectileLauncher for Recorder {
    fn launch(&mut self, spec: &ProjectileSpec, origin: Vec3, direction: Vec3) {
        self.0
            .borrow_mut()
            .launches
            .push((spec.name.clone(), origin, direction));
    }
}

// =============================================================================
// Firing range
// =============================================================================

/// A weapon at `origin` facing `+Z`, with enemies and walls in front of it.
pub struct FiringRange {
    /// Colliders
    pub space: Space,
    /// Damageable targets
    pub world: BTreeMap<TargetId, Combatant>,
    /// Weapon under test
    pub weapon: WeaponController,
    /// Collaborator log
    pub log: Recorder,
    /// Muzzle position
    pub origin: Vec3,
    /// Weapon orientation
    pub rotation: Quat,
    colliders: BTreeMap<TargetId, ColliderId>,
    next_id: u64,
}

impl FiringRange {
    /// Range with `profile` equipped and no enemies.
    pub fn new(profile: WeaponProfile) -> Self {
        let log = Recorder::default();
        let effects = WeaponEffects::default()
            .with_audio(log.clone())
            .with_observer(log.clone())
            .with_launcher(log.clone());
        let mut weapon = WeaponController::new(effects).with_spawn_point(SPAWN_POINT);
        weapon.equip(profile).expect("test profile must be valid");

        Self {
            space: Space::new(),
            world: BTreeMap::new(),
            weapon,
            log,
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            colliders: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Spawn an enemy with `hp` hit points.
    pub fn spawn_enemy(&mut self, position: Vec3, hp: f32) -> TargetId {
        let id = TargetId::new(self.next_id);
        self.next_id += 1;
        let collider = self
            .space
            .insert(
                Collider::new(Shape::sphere(position, ENEMY_RADIUS), LayerMask::ENEMY)
                    .with_owner(id.as_u64()),
            )
            .expect("enemy collider must be valid");
        self.colliders.insert(id, collider);
        self.world.insert(id, Combatant::new(position, hp));
        id
    }

    /// Place a wall slab across the range at depth `z`.
    pub fn wall(&mut self, z: f32) {
        self.space
            .insert(Collider::new(
                Shape::box_min_max(Vec3::new(-10.0, -10.0, z), Vec3::new(10.0, 10.0, z + 0.5)),
                LayerMask::ENVIRONMENT,
            ))
            .expect("wall collider must be valid");
    }

    /// Teleport an enemy.
    pub fn move_enemy(&mut self, id: TargetId, position: Vec3) {
        if let Some(target) = self.world.get_mut(&id) {
            target.position = position;
        }
        if let Some(collider) = self.colliders.get(&id) {
            self.space
                .set_shape(*collider, Shape::sphere(position, ENEMY_RADIUS))
                .expect("enemy collider must exist");
        }
    }

    /// Kill an enemy without removing its body.
    pub fn kill(&mut self, id: TargetId) {
        if let Some(target) = self.world.get_mut(&id) {
            target.apply_damage(&DamagePayload::new(f32::MAX));
        }
    }

    /// Remove an enemy from the world and the space.
    pub fn despawn(&mut self, id: TargetId) {
        self.world.remove(&id);
        self.colliders.remove(&id);
        self.space.remove_owner(id.as_u64());
    }

    /// Current hit points of an enemy, zero if it is gone.
    pub fn hp(&self, id: TargetId) -> f32 {
        self.world.get(&id).map_or(0.0, |t| t.hp)
    }

    /// Update the detection volume.
    pub fn scan(&mut self) -> Vec<TriggerEvent> {
        self.weapon
            .scan_range(&self.space, self.origin, self.rotation, &self.world)
    }

    /// Run one tick without scanning.
    pub fn step(&mut self, intent: FireIntent, dt: Duration) -> Vec<ShotEvent> {
        self.weapon.tick(&mut TickContext {
            dt,
            intent: &intent,
            origin: self.origin,
            rotation: self.rotation,
            probe: &self.space,
            world: &mut self.world,
        })
    }

    /// Scan then tick once per intent; returns every shot fired.
    pub fn run(&mut self, intents: &[FireIntent], dt: Duration) -> Vec<ShotEvent> {
        let mut shots = Vec::new();
        for intent in intents {
            self.scan();
            shots.extend(self.step(*intent, dt));
        }
        shots
    }
}

/// `n` milliseconds.
pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// One press followed by `ticks - 1` ticks of holding the trigger.
pub fn press_and_hold(ticks: usize) -> Vec<FireIntent> {
    let mut intents = vec![FireIntent::press()];
    intents.extend(std::iter::repeat(FireIntent::hold()).take(ticks.saturating_sub(1)));
    intents
}

/// One press followed by `ticks - 1` idle ticks.
pub fn tap(ticks: usize) -> Vec<FireIntent> {
    let mut intents = vec![FireIntent::press()];
    intents.extend(std::iter::repeat(FireIntent::NONE).take(ticks.saturating_sub(1)));
    intents
}
