//! Balancing data
//!
//! Read-only lookup of base stats and resistances by `(species, level)`,
//! plus the static skill loadout of each species. The table normally comes
//! from [`crate::config::ArenaConfig`]; [`BalanceTable::default`] carries the
//! shipped values.

mod loadout;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{Combatant, ResistanceProfile, StatBlock};

pub use loadout::loadout;

/// Monster species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// Fire lizard - fast, fragile, regenerates
    Emberling,
    /// Water serpent - shielded, slows its prey
    Tidecaller,
    /// Rock beast - slow, heavy hitter
    Stonehide,
    /// Poison hound - fastest, poisons on bite
    Venomfang,
}

impl Species {
    /// Get all species
    pub fn all() -> &'static [Species] {
        &[
            Species::Emberling,
            Species::Tidecaller,
            Species::Stonehide,
            Species::Venomfang,
        ]
    }
}

impl FromStr for Species {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "emberling" | "ember" => Ok(Species::Emberling),
            "tidecaller" | "tide" => Ok(Species::Tidecaller),
            "stonehide" | "stone" => Ok(Species::Stonehide),
            "venomfang" | "venom" => Ok(Species::Venomfang),
            _ => Err(BalanceError::UnknownSpecies(s.to_string())),
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Species::Emberling => "emberling",
            Species::Tidecaller => "tidecaller",
            Species::Stonehide => "stonehide",
            Species::Venomfang => "venomfang",
        };
        write!(f, "{}", s)
    }
}

/// Balancing lookup errors
#[derive(Debug, Error, PartialEq)]
pub enum BalanceError {
    #[error("no balancing entry for species {0}")]
    MissingSpecies(Species),

    #[error("invalid level {0} (must be at least 1)")]
    InvalidLevel(u32),

    #[error("unknown species: {0}")]
    UnknownSpecies(String),
}

/// Per-level multiplicative growth of each stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthRates {
    pub max_health: f64,
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
}

impl Default for GrowthRates {
    fn default() -> Self {
        Self {
            max_health: 0.08,
            attack: 0.06,
            defense: 0.05,
            speed: 0.03,
        }
    }
}

/// Level-1 stats of one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesStats {
    pub max_health: f64,
    pub attack: f64,
    pub defense: f64,
    pub speed: f64,
    #[serde(default)]
    pub resistances: ResistanceProfile,
}

impl SpeciesStats {
    fn new(max_health: f64, attack: f64, defense: f64, speed: f64) -> Self {
        Self {
            max_health,
            attack,
            defense,
            speed,
            resistances: ResistanceProfile::new(),
        }
    }

    fn resisting(mut self, resistances: ResistanceProfile) -> Self {
        self.resistances = resistances;
        self
    }
}

/// Base stats and resistances per species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceTable {
    #[serde(default)]
    pub growth: GrowthRates,
    #[serde(default)]
    pub species: BTreeMap<Species, SpeciesStats>,
}

impl Default for BalanceTable {
    fn default() -> Self {
        use crate::combat::Element::*;

        let mut species = BTreeMap::new();
        species.insert(
            Species::Emberling,
            SpeciesStats::new(48.0, 12.0, 3.0, 9.0)
                .resisting(ResistanceProfile::new().with(Fire, 0.3).with(Water, -0.2)),
        );
        species.insert(
            Species::Tidecaller,
            SpeciesStats::new(55.0, 10.0, 4.0, 7.0)
                .resisting(ResistanceProfile::new().with(Water, 0.3).with(Poison, -0.1)),
        );
        species.insert(
            Species::Stonehide,
            SpeciesStats::new(65.0, 9.0, 6.0, 4.0)
                .resisting(ResistanceProfile::new().with(Physical, 0.2).with(Water, -0.2)),
        );
        species.insert(
            Species::Venomfang,
            SpeciesStats::new(45.0, 11.0, 2.0, 10.0)
                .resisting(ResistanceProfile::new().with(Poison, 0.5).with(Fire, -0.1)),
        );

        Self {
            growth: GrowthRates::default(),
            species,
        }
    }
}

impl BalanceTable {
    /// Stats and resistances for a species at a level.
    ///
    /// Each stat is `round(base * (1 + growth)^(level - 1))`.
    pub fn stats_for(
        &self,
        species: Species,
        level: u32,
    ) -> Result<(StatBlock, ResistanceProfile), BalanceError> {
        if level < 1 {
            return Err(BalanceError::InvalidLevel(level));
        }
        let base = self
            .species
            .get(&species)
            .ok_or(BalanceError::MissingSpecies(species))?;

        let steps = (level - 1) as i32;
        let scale = |value: f64, growth: f64| (value * (1.0 + growth).powi(steps)).round();

        let stats = StatBlock::new(
            scale(base.max_health, self.growth.max_health),
            scale(base.attack, self.growth.attack),
            scale(base.defense, self.growth.defense),
            scale(base.speed, self.growth.speed),
        );
        Ok((stats, base.resistances))
    }
}

/// Build a fresh combatant with its species loadout
pub fn spawn(species: Species, level: u32, table: &BalanceTable) -> Result<Combatant, BalanceError> {
    let (stats, resistances) = table.stats_for(species, level)?;
    Combatant::new(species, level, stats, resistances, loadout(species))
}
