//! Arena configuration
//!
//! Layered with figment:
//! 1. built-in defaults
//! 2. optional TOML file
//! 3. `ARENA_`-prefixed environment variables (`__` separates nested keys,
//!    e.g. `ARENA_BATTLE__ROUND_LIMIT=50`)

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::balance::BalanceTable;
use crate::combat::{AiSelector, DECISIVE_RATIO, ROUND_LIMIT};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    MissingFile(String),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    #[error("invalid value for {field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

/// Battle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Rounds before a stalled battle is called a draw
    pub round_limit: u32,
    /// Preview ratio above which the AI skips the coin flip
    pub decisive_ratio: f64,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            round_limit: ROUND_LIMIT,
            decisive_ratio: DECISIVE_RATIO,
            seed: None,
        }
    }
}

impl BattleConfig {
    pub fn ai_selector(&self) -> AiSelector {
        AiSelector::new(self.decisive_ratio)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(default)]
    pub battle: BattleConfig,
    #[serde(default)]
    pub balance: BalanceTable,
}

impl ArenaConfig {
    /// Load defaults, then the optional TOML file, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ArenaConfig::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.display().to_string()));
            }
            figment = figment.merge(Toml::file(path));
        }

        let config: ArenaConfig = figment
            .merge(Env::prefixed("ARENA_").split("__"))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string layered over the defaults (no environment)
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: ArenaConfig = Figment::from(Serialized::defaults(ArenaConfig::default()))
            .merge(Toml::string(toml))
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.battle.round_limit == 0 {
            return Err(ConfigError::OutOfRange {
                field: "battle.round_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.battle.decisive_ratio.is_finite() && self.battle.decisive_ratio > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "battle.decisive_ratio",
                reason: format!("{} is not a positive number", self.battle.decisive_ratio),
            });
        }
        for (species, stats) in &self.balance.species {
            if stats.max_health <= 0.0 || stats.attack < 0.0 || stats.defense < 0.0 || stats.speed < 0.0 {
                return Err(ConfigError::OutOfRange {
                    field: "balance.species",
                    reason: format!("{} has negative stats or no health", species),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::Species;

    #[test]
    fn test_defaults() {
        let config = ArenaConfig::from_toml_str("").unwrap();
        assert_eq!(config.battle.round_limit, ROUND_LIMIT);
        assert_eq!(config.battle.decisive_ratio, DECISIVE_RATIO);
        assert_eq!(config.balance, BalanceTable::default());
    }

    #[test]
    fn test_toml_overrides_one_species() {
        let config = ArenaConfig::from_toml_str(
            r#"
            [battle]
            round_limit = 30
            seed = 7

            [balance.species.stonehide]
            max_health = 80.0
            attack = 9.0
            defense = 6.0
            speed = 4.0
            resistances = { physical = 0.4 }
            "#,
        )
        .unwrap();

        assert_eq!(config.battle.round_limit, 30);
        assert_eq!(config.battle.seed, Some(7));
        let stone = &config.balance.species[&Species::Stonehide];
        assert_eq!(stone.max_health, 80.0);
        assert_eq!(stone.resistances.physical, 0.4);
        // Nested tables merge key by key
        assert_eq!(stone.resistances.water, -0.2);
        // Untouched species keep their defaults
        assert!(config.balance.species.contains_key(&Species::Emberling));
    }

    #[test]
    fn test_rejects_zero_round_limit() {
        let err = ArenaConfig::from_toml_str("[battle]\nround_limit = 0").unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn test_rejects_unknown_species() {
        let err = ArenaConfig::from_toml_str(
            "[balance.species.dragon]\nmax_health = 1.0\nattack = 1.0\ndefense = 1.0\nspeed = 1.0",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ArenaConfig::load(Some(Path::new("/nonexistent/arena.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }
}
