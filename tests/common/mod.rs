//! Common test utilities - fixture monsters and a seeded RNG

#![allow(dead_code)]

use arena::balance::Species;
use arena::combat::{
    BattleEvent, BattleRng, Combatant, ResistanceProfile, RoundReport, Side, SkillSet, StatBlock,
};

pub const SEED: u64 = 0x5eed;

pub fn seeded_rng() -> BattleRng {
    BattleRng::seeded(SEED)
}

/// Builder for hand-tuned combatants
pub struct MonsterBuilder {
    species: Species,
    stats: StatBlock,
    resistances: ResistanceProfile,
    skills: SkillSet,
}

impl MonsterBuilder {
    pub fn new(species: Species) -> Self {
        Self {
            species,
            stats: StatBlock::new(100.0, 10.0, 0.0, 5.0),
            resistances: ResistanceProfile::new(),
            skills: SkillSet::new(),
        }
    }

    pub fn health(mut self, health: f64) -> Self {
        self.stats.max_health = health;
        self.stats.current_health = health;
        self
    }

    pub fn attack(mut self, attack: f64) -> Self {
        self.stats.attack_power = attack;
        self
    }

    pub fn defense(mut self, defense: f64) -> Self {
        self.stats.defense_power = defense;
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.stats.speed = speed;
        self
    }

    pub fn resistances(mut self, resistances: ResistanceProfile) -> Self {
        self.resistances = resistances;
        self
    }

    pub fn skills(mut self, skills: SkillSet) -> Self {
        self.skills = skills;
        self
    }

    pub fn build(self) -> Combatant {
        Combatant::new(self.species, 1, self.stats, self.resistances, self.skills).unwrap()
    }
}

/// Every event from a list of reports, in order
pub fn all_events(reports: &[RoundReport]) -> Vec<BattleEvent> {
    reports.iter().flat_map(|r| r.events.iter().cloned()).collect()
}

/// Damage-over-time ticks of one named effect on one side
pub fn effect_damage_ticks(events: &[BattleEvent], side: Side, name: &str) -> usize {
    events
        .iter()
        .filter(|e| {
            matches!(e, BattleEvent::EffectDamage { target, effect, .. }
                if *target == side && effect == name)
        })
        .count()
}
