//! Weapon configuration.
//!
//! A [`WeaponProfile`] is everything the firing core needs to know about a
//! gun: reach, damage, ammo, timing, burst size and fire mode. Profiles are
//! plain data: build one in code, start from a [`GunKind`] preset, or load
//! one from JSON. Missing JSON fields fall back to the pistol preset.
//!
//! # Example
//!
//! ```
//! use gunline_core::profile::{GunKind, WeaponProfile};
//!
//! let shotgun = WeaponProfile::preset(GunKind::Shotgun);
//! assert!(shotgun.spread);
//! assert!(shotgun.validate().is_ok());
//!
//! let custom = WeaponProfile::from_json(r#"{ "name": "blaster", "ammo": 12, "spread": true }"#).unwrap();
//! assert_eq!(custom.ammo, 12);
//! assert!((custom.range - 20.0).abs() < f32::EPSILON);
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sightline::{LayerMask, TriggerVolume};

use crate::error::ConfigError;

/// Line-of-sight probes reach this much further than the detection volume.
pub const PROBE_RANGE_FACTOR: f32 = 1.5;

/// Weapon family. Drives presets and HUD identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GunKind {
    /// Semi-automatic sidearm
    #[default]
    Pistol,
    /// Pump shotgun, damages everything in line
    Shotgun,
    /// Double-barrel shotgun, heavier and slower
    SuperShotgun,
    /// Automatic, fires two-round bursts while held
    Chaingun,
    /// Fires rockets instead of resolving hits instantly
    RocketLauncher,
    /// Automatic projectile weapon
    PlasmaRifle,
}

impl GunKind {
    /// Returns `true` for shotgun-class weapons.
    #[must_use]
    pub const fn is_spread(self) -> bool {
        matches!(self, Self::Shotgun | Self::SuperShotgun)
    }
}

impl fmt::Display for GunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pistol => write!(f, "Pistol"),
            Self::Shotgun => write!(f, "Shotgun"),
            Self::SuperShotgun => write!(f, "Super Shotgun"),
            Self::Chaingun => write!(f, "Chaingun"),
            Self::RocketLauncher => write!(f, "Rocket Launcher"),
            Self::PlasmaRifle => write!(f, "Plasma Rifle"),
        }
    }
}

/// Damage delivered to each target a shot connects with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamagePayload {
    /// Hit points removed
    pub amount: f32,
    /// Push-back impulse, interpreted by the target
    #[serde(default)]
    pub knockback: f32,
}

impl DamagePayload {
    /// Damage with no knockback.
    #[must_use]
    pub const fn new(amount: f32) -> Self {
        Self {
            amount,
            knockback: 0.0,
        }
    }
}

impl Default for DamagePayload {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// What a projectile weapon hands to the launcher instead of resolving hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    /// Prefab / pool key of the projectile
    pub name: String,
    /// Launch speed in units per second
    pub speed: f32,
}

/// Complete configuration of one weapon.
///
/// `ammo` is the only field that changes during play; the controller owns
/// the profile and decrements it once per shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponProfile {
    /// Display name
    pub name: String,
    /// Weapon family
    pub kind: GunKind,
    /// Depth of the detection volume; probes reach `1.5 × range`
    pub range: f32,
    /// Height of the detection volume
    pub vertical_range: f32,
    /// Damage applied per hit
    pub damage: DamagePayload,
    /// Rounds left
    pub ammo: u32,
    /// Seconds between shots inside a burst
    pub time_between_shots: f32,
    /// Seconds from the start of a burst until the weapon is ready again
    pub time_between_bursts: f32,
    /// Shots per fire activation
    pub bullets_per_burst: u32,
    /// Keep firing while the trigger is held (automatic) instead of once per press
    pub hold_to_fire: bool,
    /// Damage every target in line instead of stopping at the first hit
    pub spread: bool,
    /// Projectile to launch; `None` for hit-scan weapons
    pub projectile: Option<ProjectileSpec>,
    /// Layers a line-of-sight probe collides with
    pub probe_layers: LayerMask,
    /// Layers the detection volume tracks
    pub target_layers: LayerMask,
    /// Clip played on every shot
    pub fire_sound: Option<String>,
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self::preset(GunKind::Pistol)
    }
}

impl WeaponProfile {
    /// Ready-made profile for a weapon family.
    #[must_use]
    pub fn preset(kind: GunKind) -> Self {
        let base = Self {
            name: kind.to_string(),
            kind,
            range: 20.0,
            vertical_range: 20.0,
            damage: DamagePayload::new(10.0),
            ammo: 50,
            time_between_shots: 0.1,
            time_between_bursts: 0.4,
            bullets_per_burst: 1,
            hold_to_fire: false,
            spread: kind.is_spread(),
            projectile: None,
            probe_layers: LayerMask::SHOT_BLOCKERS,
            target_layers: LayerMask::ENEMY,
            fire_sound: Some("sfx/pistol".to_string()),
        };

        match kind {
            GunKind::Pistol => base,
            GunKind::Shotgun => Self {
                damage: DamagePayload {
                    amount: 35.0,
                    knockback: 2.0,
                },
                ammo: 20,
                time_between_bursts: 0.9,
                fire_sound: Some("sfx/shotgun".to_string()),
                ..base
            },
            GunKind::SuperShotgun => Self {
                range: 14.0,
                damage: DamagePayload {
                    amount: 70.0,
                    knockback: 4.0,
                },
                ammo: 10,
                time_between_bursts: 1.4,
                fire_sound: Some("sfx/super_shotgun".to_string()),
                ..base
            },
            GunKind::Chaingun => Self {
                range: 30.0,
                ammo: 200,
                time_between_shots: 0.07,
                time_between_bursts: 0.14,
                bullets_per_burst: 2,
                hold_to_fire: true,
                fire_sound: Some("sfx/chaingun".to_string()),
                ..base
            },
            GunKind::RocketLauncher => Self {
                range: 40.0,
                damage: DamagePayload {
                    amount: 100.0,
                    knockback: 8.0,
                },
                ammo: 10,
                time_between_bursts: 0.8,
                projectile: Some(ProjectileSpec {
                    name: "rocket".to_string(),
                    speed: 25.0,
                }),
                fire_sound: Some("sfx/rocket".to_string()),
                ..base
            },
            GunKind::PlasmaRifle => Self {
                range: 40.0,
                damage: DamagePayload::new(20.0),
                ammo: 100,
                time_between_bursts: 0.1,
                hold_to_fire: true,
                projectile: Some(ProjectileSpec {
                    name: "plasma_ball".to_string(),
                    speed: 40.0,
                }),
                fire_sound: Some("sfx/plasma".to_string()),
                ..base
            },
        }
    }

    /// Parse a profile from JSON. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents and any
    /// [`validate`](Self::validate) error for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serialize the profile to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is usable at fire time.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NonPositive`] for a zero, negative or non-finite
    ///   range or timing value
    /// - [`ConfigError::EmptyBurst`] if `bullets_per_burst == 0`
    /// - [`ConfigError::InvalidDamage`] for negative or non-finite damage
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("range", self.range),
            ("vertical_range", self.vertical_range),
            ("time_between_shots", self.time_between_shots),
            ("time_between_bursts", self.time_between_bursts),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.bullets_per_burst == 0 {
            return Err(ConfigError::EmptyBurst);
        }

        let DamagePayload { amount, knockback } = self.damage;
        if !amount.is_finite() || amount < 0.0 || !knockback.is_finite() || knockback < 0.0 {
            return Err(ConfigError::InvalidDamage { amount, knockback });
        }

        if let Some(projectile) = &self.projectile {
            if !projectile.speed.is_finite() || projectile.speed <= 0.0 {
                return Err(ConfigError::NonPositive {
                    field: "projectile.speed",
                    value: projectile.speed,
                });
            }
        }

        Ok(())
    }

    /// Returns `true` if hits are resolved instantly along a line of sight.
    #[must_use]
    pub fn is_hitscan(&self) -> bool {
        self.projectile.is_none()
    }

    /// Maximum distance of a line-of-sight probe.
    #[must_use]
    pub fn probe_distance(&self) -> f32 {
        self.range * PROBE_RANGE_FACTOR
    }

    /// Spacing between shots of one burst.
    ///
    /// Only meaningful on a validated profile.
    #[must_use]
    pub fn shot_interval(&self) -> Duration {
        seconds_to_duration(self.time_between_shots)
    }

    /// Time from the first shot of a burst until the weapon is ready again.
    ///
    /// Only meaningful on a validated profile.
    #[must_use]
    pub fn burst_interval(&self) -> Duration {
        seconds_to_duration(self.time_between_bursts)
    }

    /// Build the detection volume sized for this weapon.
    #[must_use]
    pub fn detection_volume(&self) -> TriggerVolume {
        TriggerVolume::for_weapon(self.range, self.vertical_range, self.target_layers)
    }
}

/// Timers run at microsecond resolution, so `0.1` is exactly 100ms.
fn seconds_to_duration(secs: f32) -> Duration {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let micros = (f64::from(secs) * 1_000_000.0).round() as u64;
    Duration::from_micros(micros)
}
