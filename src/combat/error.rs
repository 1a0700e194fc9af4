//! Combat errors

use thiserror::Error;

use super::events::Side;
use super::skills::SkillSlot;

/// Rejected battle operations. Nothing is mutated when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CombatError {
    #[error("{side} has no skill in slot {slot:?}")]
    UnknownSkill { side: Side, slot: SkillSlot },

    #[error("{side} cannot cast {skill} in battle")]
    NotCastable { side: Side, skill: String },

    #[error("{side}'s {skill} is on cooldown ({remaining} rounds)")]
    NotReady {
        side: Side,
        skill: String,
        remaining: u32,
    },

    #[error("{0} is down and cannot act")]
    CombatantDown(Side),

    #[error("battle is already over")]
    BattleOver,

    #[error("round limit must be at least 1, got {0}")]
    InvalidRoundLimit(u32),
}
