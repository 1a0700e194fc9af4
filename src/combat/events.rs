//! Battle event channel
//!
//! The engine never formats text. Every observable step (pipeline stages,
//! effect lifecycle, cooldown changes) is pushed to a [`BattleLog`] as a
//! [`BattleEvent`] which the presentation layer renders however it likes.

use serde::Serialize;
use tracing::debug;

use super::round::RoundOutcome;
use super::stats::StatTarget;

/// Which side of the battle a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// The opposing side
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// A discrete, loggable battle event
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BattleEvent {
    BattleStarted {
        player: String,
        enemy: String,
    },
    RoundStarted {
        round: u32,
        first: Side,
    },
    SkillCast {
        attacker: Side,
        skill: String,
    },
    RawDamage {
        attacker: Side,
        value: f64,
    },
    AfterDefense {
        attacker: Side,
        value: f64,
    },
    AfterResistance {
        attacker: Side,
        value: f64,
    },
    AfterAbsorb {
        attacker: Side,
        value: f64,
    },
    FinalDamage {
        attacker: Side,
        value: f64,
    },
    DamageApplied {
        target: Side,
        amount: f64,
        health_after: f64,
    },
    /// `duration` is `None` for permanent effects
    EffectApplied {
        target: Side,
        effect: String,
        duration: Option<u32>,
    },
    EffectRefreshed {
        target: Side,
        effect: String,
        duration: Option<u32>,
    },
    EffectDamage {
        target: Side,
        effect: String,
        amount: f64,
        health_after: f64,
    },
    EffectHeal {
        target: Side,
        effect: String,
        amount: f64,
        health_after: f64,
    },
    StatShifted {
        target: Side,
        effect: String,
        stat: StatTarget,
        from: f64,
        to: f64,
    },
    EffectExpired {
        target: Side,
        effect: String,
    },
    CooldownChanged {
        side: Side,
        skill: String,
        remaining: u32,
    },
    TurnSkipped {
        side: Side,
    },
    BattleEnded {
        round: u32,
        outcome: RoundOutcome,
    },
}

impl BattleEvent {
    /// Serialize as a single JSON line
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"kind":"unserializable","error":"{}"}}"#, e)
        })
    }
}

/// Ordered sink for battle events
#[derive(Debug, Default)]
pub struct BattleLog {
    events: Vec<BattleEvent>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event, mirroring it to the tracing subscriber
    pub fn push(&mut self, event: BattleEvent) {
        debug!(?event, "battle event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.opponent(), Side::Player);
    }

    #[test]
    fn test_log_drain() {
        let mut log = BattleLog::new();
        log.push(BattleEvent::TurnSkipped { side: Side::Enemy });
        assert_eq!(log.len(), 1);

        let events = log.drain();
        assert_eq!(events.len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_json_line() {
        let event = BattleEvent::EffectApplied {
            target: Side::Player,
            effect: "Venom".to_string(),
            duration: Some(2),
        };
        let line = event.to_json_line();
        assert!(line.contains(r#""kind":"effect_applied""#));
        assert!(line.contains(r#""target":"player""#));
        assert!(line.contains(r#""duration":2"#));
    }
}
