//! Battle resolution engine
//!
//! Implements turn-based monster battles with:
//! - Stat blocks and per-element resistances
//! - Skills with cooldowns and cast/hit/spawn hooks
//! - Status effects (poison, regeneration, absorb, stat shifts, exposed)
//! - A staged damage pipeline with a minimum-1 floor
//! - AI skill selection with a coin-flip tie-break
//! - Speed-ordered rounds and victory checks

mod ai;
mod combatant;
mod damage;
mod effects;
mod error;
mod events;
mod rng;
mod round;
mod skills;
mod stats;

pub use ai::{AiDecision, AiSelector, DecisionPath, DECISIVE_RATIO};
pub use combatant::Combatant;
pub use damage::{
    absorb_stage, attack, defense_stage, final_stage, raw_damage, resistance_stage, resolve,
    validate, DamageBreakdown, MIN_DAMAGE,
};
pub use effects::{EffectDuration, EffectKind, StatusEffect};
pub use error::CombatError;
pub use events::{BattleEvent, BattleLog, Side};
pub use rng::BattleRng;
pub use round::{Battle, RoundOutcome, RoundReport, ScriptedChooser, SkillChooser, ROUND_LIMIT};
pub use skills::{Skill, SkillCategory, SkillEffect, SkillSet, SkillSlot, BASIC_ATTACK};
pub use stats::{Element, ResistanceProfile, StatBlock, StatTarget};
