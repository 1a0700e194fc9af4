//! Combatant numbers
//!
//! - Stat block (health, attack, defense, speed)
//! - Damage elements
//! - Per-element resistance profile

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Element carried by a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// No element - resistances never apply
    #[default]
    Neutral,
    /// Physical damage (claws, slams, bites)
    Physical,
    /// Fire damage
    Fire,
    /// Water damage
    Water,
    /// Poison damage
    Poison,
}

impl Element {
    /// Get all elements
    pub fn all() -> &'static [Element] {
        &[
            Element::Neutral,
            Element::Physical,
            Element::Fire,
            Element::Water,
            Element::Poison,
        ]
    }
}

impl FromStr for Element {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "neutral" => Ok(Element::Neutral),
            "physical" => Ok(Element::Physical),
            "fire" => Ok(Element::Fire),
            "water" => Ok(Element::Water),
            "poison" => Ok(Element::Poison),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Element::Neutral => "none",
            Element::Physical => "physical",
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Poison => "poison",
        };
        write!(f, "{}", s)
    }
}

/// Stats a status effect is allowed to perturb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatTarget {
    Attack,
    Defense,
    Speed,
}

impl std::fmt::Display for StatTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatTarget::Attack => "attack",
            StatTarget::Defense => "defense",
            StatTarget::Speed => "speed",
        };
        write!(f, "{}", s)
    }
}

/// Mutable numeric state of one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub max_health: f64,
    pub current_health: f64,
    pub attack_power: f64,
    pub defense_power: f64,
    pub speed: f64,
}

impl StatBlock {
    /// Create a stat block at full health
    pub fn new(max_health: f64, attack_power: f64, defense_power: f64, speed: f64) -> Self {
        Self {
            max_health,
            current_health: max_health,
            attack_power,
            defense_power,
            speed,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }

    /// Read one of the perturbable stats
    pub fn get(&self, stat: StatTarget) -> f64 {
        match stat {
            StatTarget::Attack => self.attack_power,
            StatTarget::Defense => self.defense_power,
            StatTarget::Speed => self.speed,
        }
    }

    /// Overwrite one of the perturbable stats (floored at zero)
    pub fn set(&mut self, stat: StatTarget, value: f64) {
        let value = value.max(0.0);
        match stat {
            StatTarget::Attack => self.attack_power = value,
            StatTarget::Defense => self.defense_power = value,
            StatTarget::Speed => self.speed = value,
        }
    }

    /// Subtract damage, clamping health at zero. Returns health after.
    pub fn take_damage(&mut self, amount: f64) -> f64 {
        self.current_health = (self.current_health - amount).max(0.0);
        self.current_health
    }

    /// Heal (cannot exceed max_health). Returns the amount actually healed.
    pub fn heal(&mut self, amount: f64) -> f64 {
        let actual = amount.min(self.max_health - self.current_health).max(0.0);
        self.current_health += actual;
        actual
    }

    pub fn restore_full_health(&mut self) {
        self.current_health = self.max_health;
    }
}

/// Per-element fraction of damage removed
///
/// Negative values are vulnerabilities. The pipeline clamps the result to a
/// minimum of 1, so even a resistance of 1.0 never fully negates a hit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistanceProfile {
    pub physical: f64,
    pub fire: f64,
    pub water: f64,
    pub poison: f64,
}

impl ResistanceProfile {
    /// Create a profile with no resistances
    pub fn new() -> Self {
        Self::default()
    }

    /// Resistance matching an element (0 for elementless damage)
    pub fn for_element(&self, element: Element) -> f64 {
        match element {
            Element::Neutral => 0.0,
            Element::Physical => self.physical,
            Element::Fire => self.fire,
            Element::Water => self.water,
            Element::Poison => self.poison,
        }
    }

    /// Set the resistance for an element. Elementless damage has no slot.
    pub fn set(&mut self, element: Element, value: f64) {
        match element {
            Element::Neutral => {
                tracing::warn!("ignoring resistance for elementless damage");
            }
            Element::Physical => self.physical = value,
            Element::Fire => self.fire = value,
            Element::Water => self.water = value,
            Element::Poison => self.poison = value,
        }
    }

    pub fn with(mut self, element: Element, value: f64) -> Self {
        self.set(element, value);
        self
    }

    /// Elements this profile resists (positive value)
    pub fn resistances(&self) -> Vec<Element> {
        Element::all()
            .iter()
            .copied()
            .filter(|e| self.for_element(*e) > 0.0)
            .collect()
    }

    /// Elements this profile is vulnerable to (negative value)
    pub fn vulnerabilities(&self) -> Vec<Element> {
        Element::all()
            .iter()
            .copied()
            .filter(|e| self.for_element(*e) < 0.0)
            .collect()
    }
}
