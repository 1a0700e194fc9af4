//! Combatant aggregate
//!
//! Owns one monster's stats, resistances, skills and ordered status effects.
//! All mutation goes through the round controller and the hooks it invokes.

use crate::balance::{BalanceError, BalanceTable, Species};

use super::effects::{EffectKind, StatusEffect};
use super::events::{BattleEvent, BattleLog, Side};
use super::skills::{Skill, SkillSet, SkillSlot};
use super::stats::{ResistanceProfile, StatBlock};

/// One side's monster with full battle-relevant state
#[derive(Debug, Clone)]
pub struct Combatant {
    species: Species,
    level: u32,
    stats: StatBlock,
    resistances: ResistanceProfile,
    skills: SkillSet,
    effects: Vec<StatusEffect>,
}

impl Combatant {
    /// Create a combatant from already-resolved parts. Levels start at 1.
    pub fn new(
        species: Species,
        level: u32,
        stats: StatBlock,
        resistances: ResistanceProfile,
        skills: SkillSet,
    ) -> Result<Self, BalanceError> {
        if level < 1 {
            return Err(BalanceError::InvalidLevel(level));
        }
        Ok(Self {
            species,
            level,
            stats,
            resistances,
            skills,
            effects: Vec::new(),
        })
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatBlock {
        &mut self.stats
    }

    pub fn resistances(&self) -> &ResistanceProfile {
        &self.resistances
    }

    pub fn skills(&self) -> &SkillSet {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut SkillSet {
        &mut self.skills
    }

    /// Active effects in attachment order
    pub fn effects(&self) -> &[StatusEffect] {
        &self.effects
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name == name)
    }

    pub fn health(&self) -> f64 {
        self.stats.current_health
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn skill(&self, slot: SkillSlot) -> Option<&Skill> {
        self.skills.get(slot)
    }

    /// Skills the player may pick from right now, basic attack first
    pub fn ready_skills(&self) -> Vec<(SkillSlot, &Skill)> {
        self.skills.ready_skills()
    }

    /// Selection preview: attack power times skill power, ignoring the defender
    pub fn preview_damage(&self, slot: SkillSlot) -> Option<f64> {
        self.skills
            .get(slot)
            .map(|skill| self.stats.attack_power * skill.power)
    }

    /// Fire the passive skill's spawn hook.
    ///
    /// A passive stat shift lands immediately, so it already counts for the
    /// first round's turn order and damage.
    pub fn spawn(&mut self, side: Side, log: &mut BattleLog) {
        let aura = self.skills.passive().and_then(|p| p.on_spawn()).cloned();
        if let Some(mut effect) = aura {
            if matches!(effect.kind, EffectKind::StatShift { .. }) && !self.has_effect(&effect.name) {
                effect.apply_start_of_turn(&mut self.stats, side, log);
            }
            self.attach(effect, false, side, log);
        }
    }

    /// Attach an effect mid-round. It stays dormant until the next round.
    pub fn attach_effect(&mut self, effect: StatusEffect, side: Side, log: &mut BattleLog) {
        self.attach(effect, true, side, log);
    }

    fn attach(&mut self, mut effect: StatusEffect, dormant: bool, side: Side, log: &mut BattleLog) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.name == effect.name) {
            existing.refresh(&effect);
            log.push(BattleEvent::EffectRefreshed {
                target: side,
                effect: existing.name.clone(),
                duration: existing.remaining_rounds(),
            });
            return;
        }

        effect.set_dormant(dormant);
        log.push(BattleEvent::EffectApplied {
            target: side,
            effect: effect.name.clone(),
            duration: effect.remaining_rounds(),
        });
        self.effects.push(effect);
    }

    /// Wake effects attached during the previous round
    pub fn awaken_effects(&mut self) {
        for effect in self.effects.iter_mut() {
            effect.set_dormant(false);
        }
    }

    pub fn run_start_of_turn(&mut self, side: Side, log: &mut BattleLog) {
        for effect in self.effects.iter_mut().filter(|e| !e.is_dormant()) {
            effect.apply_start_of_turn(&mut self.stats, side, log);
        }
    }

    pub fn run_end_of_turn(&mut self, side: Side, log: &mut BattleLog) {
        for effect in self.effects.iter_mut().filter(|e| !e.is_dormant()) {
            effect.apply_end_of_turn(&mut self.stats, side, log);
        }
    }

    /// Tick every awake effect, then expire and remove the finished ones
    pub fn tick_effects(&mut self, side: Side, log: &mut BattleLog) {
        for effect in self.effects.iter_mut().filter(|e| !e.is_dormant()) {
            effect.tick();
        }

        // Newest first
        for index in (0..self.effects.len()).rev() {
            let effect = &self.effects[index];
            if !effect.is_dormant() && effect.is_expired() {
                self.expire_at(index, side, log);
            }
        }
    }

    /// Remove the effect at `index` and undo its stat shift.
    ///
    /// Newer shifts on the same stat are re-applied over the restored value,
    /// leaving the stat as if the removed shift had never landed.
    fn expire_at(&mut self, index: usize, side: Side, log: &mut BattleLog) {
        let mut effect = self.effects.remove(index);
        let shifted = effect.shifted_stat();
        effect.on_expire(&mut self.stats, side, log);
        log.push(BattleEvent::EffectExpired {
            target: side,
            effect: effect.name,
        });

        if let Some(stat) = shifted {
            for later in self.effects[index..]
                .iter_mut()
                .filter(|e| e.shifted_stat() == Some(stat))
            {
                later.rebase_shift(&mut self.stats, side, log);
            }
        }
    }

    pub fn tick_cooldowns(&mut self, side: Side, log: &mut BattleLog) {
        for (skill, remaining) in self.skills.tick_cooldowns() {
            log.push(BattleEvent::CooldownChanged {
                side,
                skill,
                remaining,
            });
        }
    }

    /// Fraction removed by the first absorb effect, if any
    pub fn absorb_percent(&self) -> Option<f64> {
        self.effects.iter().find_map(|e| e.absorb_percent())
    }

    /// Let every effect transform incoming damage, in attachment order
    pub fn modify_incoming(&self, damage: f64) -> f64 {
        self.effects
            .iter()
            .fold(damage, |value, effect| effect.modify_incoming(value))
    }

    /// Remove every effect, permanent ones included, undoing stat shifts
    pub fn clear_effects(&mut self, side: Side, log: &mut BattleLog) {
        while let Some(last) = self.effects.len().checked_sub(1) {
            self.expire_at(last, side, log);
        }
    }

    /// Reset between stages: no effects, no cooldowns, full health
    pub fn prepare_for_next_stage(&mut self, side: Side, log: &mut BattleLog) {
        self.clear_effects(side, log);
        self.skills.reset_cooldowns();
        self.stats.restore_full_health();
    }

    /// Gain a level, rescaling base stats from the balancing table.
    ///
    /// Current health rises by the max-health gain. Call between stages,
    /// after [`Combatant::clear_effects`], so no stat shift is in flight.
    pub fn level_up(&mut self, table: &BalanceTable) -> Result<(), BalanceError> {
        let level = self.level + 1;
        let (stats, resistances) = table.stats_for(self.species, level)?;

        let gain = (stats.max_health - self.stats.max_health).max(0.0);
        let current = (self.stats.current_health + gain).min(stats.max_health);

        self.stats = StatBlock {
            current_health: current,
            ..stats
        };
        self.resistances = resistances;
        self.level = level;
        tracing::info!(species = %self.species, level, "level up");
        Ok(())
    }
}
