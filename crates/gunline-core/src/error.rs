//! Configuration errors.
//!
//! Everything that can go wrong with a weapon is caught when the profile is
//! equipped. Firing itself never fails: a weapon that cannot fire simply
//! does not.

use thiserror::Error;

/// Reasons a [`WeaponProfile`](crate::profile::WeaponProfile) is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A distance or duration is zero, negative, NaN or infinite.
    #[error("`{field}` must be finite and greater than zero, got {value}")]
    NonPositive {
        /// Name of the offending profile field
        field: &'static str,
        /// Rejected value
        value: f32,
    },

    /// `bullets_per_burst` is zero.
    #[error("`bullets_per_burst` must be at least 1")]
    EmptyBurst,

    /// Damage amount or knockback is negative or not finite.
    #[error("damage payload must be finite and non-negative, got {amount} (knockback {knockback})")]
    InvalidDamage {
        /// Rejected damage amount
        amount: f32,
        /// Rejected knockback
        knockback: f32,
    },

    /// A projectile weapon was equipped on a controller with no spawn point.
    #[error("projectile weapon `{0}` needs a projectile spawn point")]
    MissingSpawnPoint(String),

    /// The profile document could not be parsed.
    #[error("malformed weapon profile: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_field() {
        let err = ConfigError::NonPositive {
            field: "time_between_shots",
            value: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "`time_between_shots` must be finite and greater than zero, got 0"
        );
    }

    #[test]
    fn parse_errors_convert() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
