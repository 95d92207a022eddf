//! Board configuration.
//!
//! # Responsibility
//! - Collect tunables for form validation and logging in one place.
//! - Resolve them from `PROJBOARD_*` environment variables.
//!
//! # Invariants
//! - Blank or unset variables fall back to defaults.
//! - `min_people`, when set, never exceeds `max_people`.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "PROJBOARD_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PROJBOARD_LOG_DIR";
pub const ENV_MAX_PEOPLE: &str = "PROJBOARD_MAX_PEOPLE";
pub const ENV_MIN_PEOPLE: &str = "PROJBOARD_MIN_PEOPLE";

/// Upper team-size bound accepted by the form.
pub const DEFAULT_MAX_PEOPLE: i64 = 6;

/// Configuration resolution errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidNumber { key: String, value: String },
    InvertedPeopleRange { min: i64, max: i64 },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "{key} must be an integer, got `{value}`")
            }
            Self::InvertedPeopleRange { min, max } => {
                write!(f, "min people ({min}) must be <= max people ({max})")
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub max_people: i64,
    /// `None` keeps the historical behavior of accepting any team size up to
    /// `max_people`, zero and negatives included.
    pub min_people: Option<i64>,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_people: DEFAULT_MAX_PEOPLE,
            min_people: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl BoardConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, e.g. a fixed map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        if let Some(raw) = read(ENV_MAX_PEOPLE) {
            config.max_people = parse_int(ENV_MAX_PEOPLE, &raw)?;
        }
        if let Some(raw) = read(ENV_MIN_PEOPLE) {
            config.min_people = Some(parse_int(ENV_MIN_PEOPLE, &raw)?);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.min_people {
            Some(min) if min > self.max_people => Err(ConfigError::InvertedPeopleRange {
                min,
                max: self.max_people,
            }),
            _ => Ok(()),
        }
    }
}

fn parse_int(key: &str, raw: &str) -> Result<i64, ConfigError> {
    raw.parse::<i64>().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{BoardConfig, ConfigError, DEFAULT_MAX_PEOPLE, ENV_MAX_PEOPLE, ENV_MIN_PEOPLE};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_historical_form_rules() {
        let config = BoardConfig::from_lookup(lookup(&[])).expect("empty env should resolve");
        assert_eq!(config.max_people, DEFAULT_MAX_PEOPLE);
        assert_eq!(config.min_people, None);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn reads_overrides_and_ignores_blanks() {
        let config = BoardConfig::from_lookup(lookup(&[
            ("PROJBOARD_LOG_LEVEL", " warn "),
            ("PROJBOARD_LOG_DIR", "/tmp/projboard"),
            (ENV_MAX_PEOPLE, "10"),
            (ENV_MIN_PEOPLE, "   "),
        ]))
        .expect("overrides should resolve");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/projboard")));
        assert_eq!(config.max_people, 10);
        assert_eq!(config.min_people, None);
    }

    #[test]
    fn rejects_non_numeric_bounds() {
        let err = BoardConfig::from_lookup(lookup(&[(ENV_MAX_PEOPLE, "six")]))
            .expect_err("non-numeric max must fail");
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = BoardConfig::from_lookup(lookup(&[(ENV_MIN_PEOPLE, "7")]))
            .expect_err("min above max must fail");
        assert_eq!(err, ConfigError::InvertedPeopleRange { min: 7, max: 6 });
    }
}
