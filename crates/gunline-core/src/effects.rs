//! Outbound collaborators: what a shot does besides dealing damage.
//!
//! The weapon owns one [`WeaponEffects`] bundle, injected at construction.
//! Every collaborator is fire-and-forget: none can refuse a shot or report
//! an error back into the firing core.

use glam::Vec3;

use crate::controller::ShotEvent;
use crate::profile::ProjectileSpec;

/// Plays one-shot sound clips.
pub trait AudioSink {
    /// Play `clip` at a world position.
    fn play(&mut self, clip: &str, position: Vec3);
}

/// Ammo counter, HUD, stats. Purely observational.
pub trait WeaponObserver {
    /// A shot was fired.
    fn on_shot(&mut self, _event: &ShotEvent) {}

    /// The magazine count changed.
    fn on_ammo_changed(&mut self, _ammo: u32) {}

    /// The trigger was pulled on an empty magazine.
    fn on_dry_fire(&mut self) {}
}

/// Spawns projectiles for weapons that do not resolve hits instantly.
pub trait ProjectileLauncher {
    /// Launch `spec` from `origin` travelling along `direction` (unit length).
    fn launch(&mut self, spec: &ProjectileSpec, origin: Vec3, direction: Vec3);
}

/// Collaborator that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _clip: &str, _position: Vec3) {}
}

impl WeaponObserver for Silent {}

impl ProjectileLauncher for Silent {
    fn launch(&mut self, spec: &ProjectileSpec, _origin: Vec3, _direction: Vec3) {
        tracing::trace!(projectile = %spec.name, "no launcher attached, projectile dropped");
    }
}

/// Collaborators a weapon reports to.
pub struct WeaponEffects {
    /// Sound playback
    pub audio: Box<dyn AudioSink>,
    /// Ammo/UI display
    pub observer: Box<dyn WeaponObserver>,
    /// Projectile spawning
    pub launcher: Box<dyn ProjectileLauncher>,
}

impl WeaponEffects {
    /// Bundle of collaborators.
    #[must_use]
    pub fn new(
        audio: Box<dyn AudioSink>,
        observer: Box<dyn WeaponObserver>,
        launcher: Box<dyn ProjectileLauncher>,
    ) -> Self {
        Self {
            audio,
            observer,
            launcher,
        }
    }

    /// Replace the audio sink.
    #[must_use]
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: impl WeaponObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Replace the projectile launcher.
    #[must_use]
    pub fn with_launcher(mut self, launcher: impl ProjectileLauncher + 'static) -> Self {
        self.launcher = Box::new(launcher);
        self
    }
}

impl Default for WeaponEffects {
    fn default() -> Self {
        Self::new(Box::new(Silent), Box::new(Silent), Box::new(Silent))
    }
}

impl std::fmt::Debug for WeaponEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeaponEffects").finish_non_exhaustive()
    }
}
