//! Damage pipeline
//!
//! Turns (attacker, defender, skill) into applied damage through ordered
//! stages. Each stage feeds the next and is recorded in the
//! [`DamageBreakdown`] and the battle log:
//!
//! 1. cast hook (may buff the attacker)
//! 2. raw damage = attack power * skill power
//! 3. defense reduction
//! 4. elemental resistance
//! 5. absorb effect
//! 6. final modification by the defender's effects
//! 7. application to the defender's health
//! 8. hit hook (may afflict the defender)
//!
//! Stages 3-6 clamp to a minimum of 1 so an attack is never fully negated.

use serde::Serialize;

use super::combatant::Combatant;
use super::error::CombatError;
use super::events::{BattleEvent, BattleLog, Side};
use super::skills::SkillSlot;

/// Smallest damage any hit can deal
pub const MIN_DAMAGE: f64 = 1.0;

/// Every intermediate value of one resolved attack
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageBreakdown {
    pub skill: String,
    pub raw: f64,
    pub after_defense: f64,
    pub after_resistance: f64,
    pub after_absorb: f64,
    pub final_damage: f64,
    pub health_after: f64,
}

pub fn raw_damage(attack_power: f64, skill_power: f64) -> f64 {
    attack_power * skill_power
}

pub fn defense_stage(value: f64, defense_power: f64) -> f64 {
    (value - defense_power).max(MIN_DAMAGE)
}

pub fn resistance_stage(value: f64, resistance: f64) -> f64 {
    (value * (1.0 - resistance)).max(MIN_DAMAGE)
}

pub fn absorb_stage(value: f64, absorb: Option<f64>) -> f64 {
    match absorb {
        Some(percent) => (value * (1.0 - percent)).max(MIN_DAMAGE),
        None => value,
    }
}

pub fn final_stage(defender: &Combatant, value: f64) -> f64 {
    defender.modify_incoming(value).max(MIN_DAMAGE)
}

/// Check that `attacker` may cast the skill in `slot` right now
pub fn validate(attacker: &Combatant, side: Side, slot: SkillSlot) -> Result<(), CombatError> {
    if !attacker.is_alive() {
        return Err(CombatError::CombatantDown(side));
    }
    let skill = attacker
        .skill(slot)
        .ok_or(CombatError::UnknownSkill { side, slot })?;
    if !skill.is_castable() {
        if skill.is_ready() {
            return Err(CombatError::NotCastable {
                side,
                skill: skill.name.clone(),
            });
        }
        return Err(CombatError::NotReady {
            side,
            skill: skill.name.clone(),
            remaining: skill.remaining_cooldown(),
        });
    }
    Ok(())
}

/// Run the damage pipeline. Validation happens before any mutation.
pub fn resolve(
    attacker: &mut Combatant,
    attacker_side: Side,
    defender: &mut Combatant,
    slot: SkillSlot,
    log: &mut BattleLog,
) -> Result<DamageBreakdown, CombatError> {
    validate(attacker, attacker_side, slot)?;
    let skill = attacker
        .skill(slot)
        .cloned()
        .ok_or(CombatError::UnknownSkill {
            side: attacker_side,
            slot,
        })?;
    let defender_side = attacker_side.opponent();

    // 1. cast
    log.push(BattleEvent::SkillCast {
        attacker: attacker_side,
        skill: skill.name.clone(),
    });
    if let Some(buff) = skill.on_cast() {
        attacker.attach_effect(buff.clone(), attacker_side, log);
    }

    // 2. raw
    let raw = raw_damage(attacker.stats().attack_power, skill.power);
    log.push(BattleEvent::RawDamage {
        attacker: attacker_side,
        value: raw,
    });

    // 3. defense
    let after_defense = defense_stage(raw, defender.stats().defense_power);
    log.push(BattleEvent::AfterDefense {
        attacker: attacker_side,
        value: after_defense,
    });

    // 4. resistance
    let resistance = defender.resistances().for_element(skill.element);
    let after_resistance = resistance_stage(after_defense, resistance);
    log.push(BattleEvent::AfterResistance {
        attacker: attacker_side,
        value: after_resistance,
    });

    // 5. absorb
    let after_absorb = absorb_stage(after_resistance, defender.absorb_percent());
    log.push(BattleEvent::AfterAbsorb {
        attacker: attacker_side,
        value: after_absorb,
    });

    // 6. final modification
    let final_damage = final_stage(defender, after_absorb);
    log.push(BattleEvent::FinalDamage {
        attacker: attacker_side,
        value: final_damage,
    });

    // 7. application
    let health_after = defender.stats_mut().take_damage(final_damage);
    log.push(BattleEvent::DamageApplied {
        target: defender_side,
        amount: final_damage,
        health_after,
    });

    // 8. hit
    if let Some(affliction) = skill.on_hit() {
        defender.attach_effect(affliction.clone(), defender_side, log);
    }

    Ok(DamageBreakdown {
        skill: skill.name,
        raw,
        after_defense,
        after_resistance,
        after_absorb,
        final_damage,
        health_after,
    })
}

/// The attack action: run the pipeline, then put the skill on cooldown
pub fn attack(
    attacker: &mut Combatant,
    attacker_side: Side,
    defender: &mut Combatant,
    slot: SkillSlot,
    log: &mut BattleLog,
) -> Result<DamageBreakdown, CombatError> {
    let breakdown = resolve(attacker, attacker_side, defender, slot, log)?;

    if let Some(skill) = attacker.skills_mut().get_mut(slot) {
        skill.start_cooldown();
        if skill.remaining_cooldown() > 0 {
            log.push(BattleEvent::CooldownChanged {
                side: attacker_side,
                skill: skill.name.clone(),
                remaining: skill.remaining_cooldown(),
            });
        }
    }

    Ok(breakdown)
}
