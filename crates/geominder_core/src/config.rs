//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve the database path, log settings and geofence radius.
//!
//! # Invariants
//! - Blank environment values behave as unset.
//! - The resolved geofence radius is finite and strictly positive.

use crate::geofence::GEOFENCE_RADIUS_IN_METERS;
use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "GEOMINDER_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "GEOMINDER_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "GEOMINDER_LOG_DIR";
pub const ENV_GEOFENCE_RADIUS_M: &str = "GEOMINDER_GEOFENCE_RADIUS_M";

const DEFAULT_DB_FILE_NAME: &str = "geominder.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidRadius(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRadius(raw) => write!(
                f,
                "invalid geofence radius `{raw}`; expected a positive number of meters"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Settings shared by the FFI and CLI front ends.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
    pub geofence_radius_m: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            geofence_radius_m: GEOFENCE_RADIUS_IN_METERS,
        }
    }
}

impl CoreConfig {
    /// Resolves configuration from `GEOMINDER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = value(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = value(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(raw) = value(ENV_GEOFENCE_RADIUS_M) {
            config.geofence_radius_m = parse_radius(&raw)?;
        }

        Ok(config)
    }

    /// Overrides the geofence radius, rejecting non-finite or non-positive values.
    pub fn set_geofence_radius_m(&mut self, radius_m: f64) -> Result<(), ConfigError> {
        self.geofence_radius_m = validate_radius(radius_m, || radius_m.to_string())?;
        Ok(())
    }
}

fn parse_radius(raw: &str) -> Result<f64, ConfigError> {
    let radius = raw
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidRadius(raw.to_string()))?;
    validate_radius(radius, || raw.to_string())
}

fn validate_radius(radius: f64, raw: impl FnOnce() -> String) -> Result<f64, ConfigError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(ConfigError::InvalidRadius(raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, ENV_DB_PATH, ENV_GEOFENCE_RADIUS_M, ENV_LOG_DIR};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).expect("defaults should resolve");
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.ends_with("geominder.sqlite3"));
    }

    #[test]
    fn blank_values_are_ignored_and_set_values_win() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, " /data/reminders.db "),
            (ENV_LOG_DIR, "   "),
            (ENV_GEOFENCE_RADIUS_M, "250"),
        ]))
        .expect("config should resolve");
        assert_eq!(config.db_path, PathBuf::from("/data/reminders.db"));
        assert_eq!(config.log_dir, None);
        assert_eq!(config.geofence_radius_m, 250.0);
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        let err = CoreConfig::from_lookup(lookup(&[(ENV_GEOFENCE_RADIUS_M, "-5")]))
            .expect_err("negative radius must fail");
        assert_eq!(err, ConfigError::InvalidRadius("-5".to_string()));
    }

    #[test]
    fn radius_override_uses_the_same_check() {
        let mut config = CoreConfig::default();
        assert_eq!(
            config.set_geofence_radius_m(-5.0),
            Err(ConfigError::InvalidRadius("-5".to_string()))
        );
        assert!(config.set_geofence_radius_m(f64::NAN).is_err());
        assert_eq!(config.geofence_radius_m, 100.0);

        config.set_geofence_radius_m(250.0).expect("positive radius is accepted");
        assert_eq!(config.geofence_radius_m, 250.0);
    }
}
