//! AI skill selection
//!
//! Picks the strongest ready skill when it is decisively better than the
//! basic attack, otherwise flips a coin between the two. The preview ignores
//! the defender entirely; it is a selection heuristic, not the pipeline.

use serde::Serialize;

use super::combatant::Combatant;
use super::rng::BattleRng;
use super::skills::{Skill, SkillSlot};

/// Default ratio above which the best skill is chosen without a coin flip
pub const DECISIVE_RATIO: f64 = 1.1;

/// How the selector arrived at its choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecisionPath {
    /// No active skill was ready
    Fallback,
    /// Best skill previewed at least `ratio` times the basic attack
    Decisive,
    /// Options were close; a coin flip decided
    CoinFlip { heads: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AiDecision {
    pub slot: SkillSlot,
    pub path: DecisionPath,
}

/// Skill selector for AI-controlled combatants
#[derive(Debug, Clone, Copy)]
pub struct AiSelector {
    decisive_ratio: f64,
}

impl Default for AiSelector {
    fn default() -> Self {
        Self::new(DECISIVE_RATIO)
    }
}

impl AiSelector {
    pub fn new(decisive_ratio: f64) -> Self {
        Self { decisive_ratio }
    }

    pub fn decisive_ratio(&self) -> f64 {
        self.decisive_ratio
    }

    /// Choose a skill. Draws at most one coin flip from `rng`.
    pub fn choose(&self, combatant: &Combatant, rng: &mut BattleRng) -> AiDecision {
        let ready = combatant.skills().ready_active();

        // Highest power wins; the earlier loadout slot keeps ties
        let mut best: Option<(SkillSlot, &Skill)> = None;
        for (slot, skill) in ready {
            if best.is_none_or(|(_, current)| skill.power > current.power) {
                best = Some((slot, skill));
            }
        }

        let Some((best_slot, best_skill)) = best else {
            return AiDecision {
                slot: SkillSlot::Basic,
                path: DecisionPath::Fallback,
            };
        };

        let attack = combatant.stats().attack_power;
        let basic_preview = attack * combatant.skills().basic().power;
        let best_preview = attack * best_skill.power;

        if best_preview >= self.decisive_ratio * basic_preview {
            return AiDecision {
                slot: best_slot,
                path: DecisionPath::Decisive,
            };
        }

        let heads = rng.coin_flip();
        AiDecision {
            slot: if heads { best_slot } else { SkillSlot::Basic },
            path: DecisionPath::CoinFlip { heads },
        }
    }
}
