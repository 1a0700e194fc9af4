//! Status effects
//!
//! Timed or permanent modifiers attached to one combatant:
//! - Poison - damage over time at end of turn
//! - Regeneration - healing at start of turn
//! - Absorb - fractional reduction of incoming hits
//! - Stat shift - one-shot multiplier on attack/defense/speed, restored on expiry
//! - Exposed - multiplies incoming final damage
//!
//! Every effect answers the same four lifecycle hooks (start of turn, end of
//! turn, tick, expire). Kinds that don't care about a hook treat it as a
//! no-op.

use serde::{Deserialize, Serialize};

use super::events::{BattleEvent, BattleLog, Side};
use super::stats::{StatBlock, StatTarget};

/// How long an effect lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectDuration {
    /// Remaining full rounds
    Rounds(u32),
    /// Never expires through ticking
    Permanent,
}

impl EffectDuration {
    /// Remaining rounds, `None` when permanent
    pub fn rounds(&self) -> Option<u32> {
        match self {
            EffectDuration::Rounds(n) => Some(*n),
            EffectDuration::Permanent => None,
        }
    }

    fn longest(self, other: EffectDuration) -> EffectDuration {
        match (self, other) {
            (EffectDuration::Rounds(a), EffectDuration::Rounds(b)) => {
                EffectDuration::Rounds(a.max(b))
            }
            _ => EffectDuration::Permanent,
        }
    }
}

/// Remembered pre-effect value of a shifted stat
///
/// `Some` means the shift has already been applied; the stored value is what
/// gets restored on expiry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShiftMemory {
    original: Option<f64>,
}

impl ShiftMemory {
    pub fn is_applied(&self) -> bool {
        self.original.is_some()
    }

    pub fn original(&self) -> Option<f64> {
        self.original
    }
}

/// Closed set of effect behaviours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectKind {
    /// Lose `percent` of max health at end of turn (minimum 1)
    Poison { percent: f64 },
    /// Recover `percent` of max health at start of turn (minimum 1)
    Regeneration { percent: f64 },
    /// Remove `percent` of incoming damage after resistances
    Absorb { percent: f64 },
    /// Multiply a stat by `factor` once, restore it on expiry
    StatShift {
        stat: StatTarget,
        factor: f64,
        #[serde(skip)]
        memory: ShiftMemory,
    },
    /// Multiply incoming final damage
    Exposed { multiplier: f64 },
}

impl EffectKind {
    pub fn stat_shift(stat: StatTarget, factor: f64) -> Self {
        EffectKind::StatShift {
            stat,
            factor,
            memory: ShiftMemory::default(),
        }
    }

    /// Short label for the kind
    pub fn label(&self) -> &'static str {
        match self {
            EffectKind::Poison { .. } => "poison",
            EffectKind::Regeneration { .. } => "regeneration",
            EffectKind::Absorb { .. } => "absorb",
            EffectKind::StatShift { .. } => "stat_shift",
            EffectKind::Exposed { .. } => "exposed",
        }
    }

    /// Whether this effect hurts its carrier
    pub fn is_debuff(&self) -> bool {
        match self {
            EffectKind::Poison { .. } | EffectKind::Exposed { .. } => true,
            EffectKind::StatShift { factor, .. } => *factor < 1.0,
            EffectKind::Regeneration { .. } | EffectKind::Absorb { .. } => false,
        }
    }
}

/// A status effect instance owned by one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub duration: EffectDuration,
    pub kind: EffectKind,
    /// Attached this round; skipped by hooks and ticking until the next round
    #[serde(skip)]
    dormant: bool,
}

impl StatusEffect {
    /// Create a new status effect
    pub fn new(name: impl Into<String>, duration: EffectDuration, kind: EffectKind) -> Self {
        Self {
            name: name.into(),
            duration,
            kind,
            dormant: false,
        }
    }

    pub fn poison(name: impl Into<String>, percent: f64, rounds: u32) -> Self {
        Self::new(name, EffectDuration::Rounds(rounds), EffectKind::Poison { percent })
    }

    pub fn regeneration(name: impl Into<String>, percent: f64, rounds: u32) -> Self {
        Self::new(
            name,
            EffectDuration::Rounds(rounds),
            EffectKind::Regeneration { percent },
        )
    }

    pub fn absorb(name: impl Into<String>, percent: f64, rounds: u32) -> Self {
        Self::new(name, EffectDuration::Rounds(rounds), EffectKind::Absorb { percent })
    }

    pub fn stat_shift(name: impl Into<String>, stat: StatTarget, factor: f64, rounds: u32) -> Self {
        Self::new(
            name,
            EffectDuration::Rounds(rounds),
            EffectKind::stat_shift(stat, factor),
        )
    }

    pub fn exposed(name: impl Into<String>, multiplier: f64, rounds: u32) -> Self {
        Self::new(
            name,
            EffectDuration::Rounds(rounds),
            EffectKind::Exposed { multiplier },
        )
    }

    /// Make this effect permanent
    pub fn permanent(mut self) -> Self {
        self.duration = EffectDuration::Permanent;
        self
    }

    pub fn is_permanent(&self) -> bool {
        self.duration == EffectDuration::Permanent
    }

    pub fn remaining_rounds(&self) -> Option<u32> {
        self.duration.rounds()
    }

    pub fn is_dormant(&self) -> bool {
        self.dormant
    }

    pub(crate) fn set_dormant(&mut self, dormant: bool) {
        self.dormant = dormant;
    }

    /// Extend this instance with a re-application of the same effect
    pub(crate) fn refresh(&mut self, other: &StatusEffect) {
        self.duration = self.duration.longest(other.duration);
    }

    /// Start-of-turn hook: regeneration and one-shot stat shifts
    pub fn apply_start_of_turn(&mut self, target: &mut StatBlock, side: Side, log: &mut BattleLog) {
        match &mut self.kind {
            EffectKind::Regeneration { percent } => {
                let amount = (target.max_health * *percent).max(1.0);
                let healed = target.heal(amount);
                log.push(BattleEvent::EffectHeal {
                    target: side,
                    effect: self.name.clone(),
                    amount: healed,
                    health_after: target.current_health,
                });
            }
            EffectKind::StatShift {
                stat,
                factor,
                memory,
            } => {
                if memory.is_applied() {
                    return;
                }
                let from = target.get(*stat);
                target.set(*stat, from * *factor);
                memory.original = Some(from);
                log.push(BattleEvent::StatShifted {
                    target: side,
                    effect: self.name.clone(),
                    stat: *stat,
                    from,
                    to: target.get(*stat),
                });
            }
            EffectKind::Poison { .. } | EffectKind::Absorb { .. } | EffectKind::Exposed { .. } => {}
        }
    }

    /// End-of-turn hook: damage over time
    pub fn apply_end_of_turn(&mut self, target: &mut StatBlock, side: Side, log: &mut BattleLog) {
        match &self.kind {
            EffectKind::Poison { percent } => {
                let amount = (target.max_health * *percent).max(1.0);
                let health_after = target.take_damage(amount);
                log.push(BattleEvent::EffectDamage {
                    target: side,
                    effect: self.name.clone(),
                    amount,
                    health_after,
                });
            }
            EffectKind::Regeneration { .. }
            | EffectKind::Absorb { .. }
            | EffectKind::StatShift { .. }
            | EffectKind::Exposed { .. } => {}
        }
    }

    /// Count down one round. Permanent effects never tick.
    pub fn tick(&mut self) {
        if let EffectDuration::Rounds(n) = &mut self.duration {
            *n = n.saturating_sub(1);
        }
    }

    pub fn is_expired(&self) -> bool {
        self.duration == EffectDuration::Rounds(0)
    }

    /// Expiry hook: undo any stat perturbation from the start-of-turn hook
    pub fn on_expire(&mut self, target: &mut StatBlock, side: Side, log: &mut BattleLog) {
        if let EffectKind::StatShift { stat, memory, .. } = &mut self.kind {
            if let Some(original) = memory.original.take() {
                let from = target.get(*stat);
                target.set(*stat, original);
                log.push(BattleEvent::StatShifted {
                    target: side,
                    effect: self.name.clone(),
                    stat: *stat,
                    from,
                    to: original,
                });
            }
        }
    }

    /// Stat this effect currently holds shifted
    pub fn shifted_stat(&self) -> Option<StatTarget> {
        match &self.kind {
            EffectKind::StatShift { stat, memory, .. } if memory.is_applied() => Some(*stat),
            _ => None,
        }
    }

    /// Re-apply an applied shift over the stat's current value.
    ///
    /// Called when an older shift on the same stat is undone underneath this one.
    pub(crate) fn rebase_shift(&mut self, target: &mut StatBlock, side: Side, log: &mut BattleLog) {
        if let EffectKind::StatShift {
            stat,
            factor,
            memory,
        } = &mut self.kind
        {
            if !memory.is_applied() {
                return;
            }
            let from = target.get(*stat);
            memory.original = Some(from);
            target.set(*stat, from * *factor);
            log.push(BattleEvent::StatShifted {
                target: side,
                effect: self.name.clone(),
                stat: *stat,
                from,
                to: target.get(*stat),
            });
        }
    }

    /// Fraction of damage this effect absorbs, if it is an absorb effect
    pub fn absorb_percent(&self) -> Option<f64> {
        match self.kind {
            EffectKind::Absorb { percent } => Some(percent),
            _ => None,
        }
    }

    /// Final-modification stage of the damage pipeline
    pub fn modify_incoming(&self, damage: f64) -> f64 {
        match self.kind {
            EffectKind::Exposed { multiplier } => damage * multiplier,
            _ => damage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> StatBlock {
        StatBlock::new(50.0, 10.0, 2.0, 8.0)
    }

    #[test]
    fn test_effect_tick() {
        let mut effect = StatusEffect::poison("Venom", 0.1, 3);

        effect.tick();
        assert_eq!(effect.remaining_rounds(), Some(2));

        effect.tick();
        effect.tick();
        assert!(effect.is_expired());

        // Floors at zero
        effect.tick();
        assert_eq!(effect.remaining_rounds(), Some(0));
    }

    #[test]
    fn test_permanent_never_expires() {
        let mut effect = StatusEffect::absorb("Shell", 0.2, 1).permanent();
        for _ in 0..10 {
            effect.tick();
        }
        assert!(!effect.is_expired());
        assert!(effect.is_permanent());
    }

    #[test]
    fn test_poison_damage() {
        let mut target = stats();
        let mut log = BattleLog::new();
        let mut effect = StatusEffect::poison("Venom", 0.1, 2);

        effect.apply_end_of_turn(&mut target, Side::Enemy, &mut log);
        assert_eq!(target.current_health, 45.0);

        // Start of turn does nothing for poison
        effect.apply_start_of_turn(&mut target, Side::Enemy, &mut log);
        assert_eq!(target.current_health, 45.0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_poison_minimum_one() {
        let mut target = StatBlock::new(5.0, 1.0, 0.0, 1.0);
        let mut log = BattleLog::new();
        let mut effect = StatusEffect::poison("Venom", 0.1, 2);

        effect.apply_end_of_turn(&mut target, Side::Player, &mut log);
        assert_eq!(target.current_health, 4.0);
    }

    #[test]
    fn test_regeneration_caps_at_max() {
        let mut target = stats();
        target.take_damage(2.0);
        let mut log = BattleLog::new();
        let mut effect = StatusEffect::regeneration("Kindle", 0.1, 3);

        effect.apply_start_of_turn(&mut target, Side::Player, &mut log);
        assert_eq!(target.current_health, 50.0);
        assert_eq!(
            log.events()[0],
            BattleEvent::EffectHeal {
                target: Side::Player,
                effect: "Kindle".to_string(),
                amount: 2.0,
                health_after: 50.0,
            }
        );
    }

    #[test]
    fn test_stat_shift_applies_once() {
        let mut target = stats();
        let mut log = BattleLog::new();
        let mut slow = StatusEffect::stat_shift("Undertow", StatTarget::Speed, 0.5, 2);

        slow.apply_start_of_turn(&mut target, Side::Enemy, &mut log);
        assert_eq!(target.speed, 4.0);

        slow.apply_start_of_turn(&mut target, Side::Enemy, &mut log);
        assert_eq!(target.speed, 4.0);
        assert_eq!(log.len(), 1);

        slow.on_expire(&mut target, Side::Enemy, &mut log);
        assert_eq!(target.speed, 8.0);
    }

    #[test]
    fn test_stat_shift_restores_exact_value() {
        let mut target = StatBlock::new(50.0, 10.0, 2.0, 7.3);
        let mut log = BattleLog::new();
        let mut slow = StatusEffect::stat_shift("Chill", StatTarget::Speed, 1.0 / 3.0, 1);

        slow.apply_start_of_turn(&mut target, Side::Enemy, &mut log);
        slow.on_expire(&mut target, Side::Enemy, &mut log);
        assert_eq!(target.speed, 7.3);
    }

    #[test]
    fn test_expire_without_apply_is_noop() {
        let mut target = stats();
        let mut log = BattleLog::new();
        let mut buff = StatusEffect::stat_shift("Rage", StatTarget::Attack, 1.5, 2);

        buff.on_expire(&mut target, Side::Player, &mut log);
        assert_eq!(target.attack_power, 10.0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_absorb_and_exposed_queries() {
        let shell = StatusEffect::absorb("Shell", 0.3, 2);
        assert_eq!(shell.absorb_percent(), Some(0.3));
        assert_eq!(shell.modify_incoming(10.0), 10.0);

        let exposed = StatusEffect::exposed("Cracked", 1.5, 2);
        assert_eq!(exposed.absorb_percent(), None);
        assert_eq!(exposed.modify_incoming(10.0), 15.0);
    }

    #[test]
    fn test_refresh_keeps_longest() {
        let mut effect = StatusEffect::poison("Venom", 0.1, 1);
        effect.refresh(&StatusEffect::poison("Venom", 0.1, 3));
        assert_eq!(effect.remaining_rounds(), Some(3));

        effect.refresh(&StatusEffect::poison("Venom", 0.1, 2));
        assert_eq!(effect.remaining_rounds(), Some(3));
    }

    #[test]
    fn test_debuff_classification() {
        assert!(EffectKind::Poison { percent: 0.1 }.is_debuff());
        assert!(EffectKind::stat_shift(StatTarget::Speed, 0.5).is_debuff());
        assert!(!EffectKind::stat_shift(StatTarget::Attack, 1.3).is_debuff());
        assert!(!EffectKind::Absorb { percent: 0.3 }.is_debuff());
    }
}
