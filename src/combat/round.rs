//! Round controller
//!
//! Sequences one full round for both combatants:
//!
//! ```text
//! RoundStart -> StartOfTurn(A) -> Act(A) -> EndOfTurn(A)
//!            -> StartOfTurn(B) -> Act(B) -> EndOfTurn(B)
//!            -> CooldownAndEffectTick -> VictoryCheck -> RoundStart | BattleOver
//! ```
//!
//! A acts first when its speed at round start is higher; ties go to the
//! player. A combatant that is down when its turn arrives skips the turn.
//! Passive stat shifts land during [`Battle::new`], so round 1 already sees
//! them.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::ai::AiSelector;
use super::combatant::Combatant;
use super::damage;
use super::error::CombatError;
use super::events::{BattleEvent, BattleLog, Side};
use super::rng::BattleRng;
use super::skills::SkillSlot;

/// Rounds played before a stalled battle is called a draw
pub const ROUND_LIMIT: u32 = 100;

/// Result of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    InProgress,
    PlayerWon,
    EnemyWon,
    /// Both sides fell in the same round, or the round limit was reached
    Draw,
}

impl RoundOutcome {
    pub fn is_over(&self) -> bool {
        *self != RoundOutcome::InProgress
    }
}

/// Skill-selection collaborator (player input or AI)
pub trait SkillChooser {
    fn choose_skill(&mut self, me: &Combatant, opponent: &Combatant, rng: &mut BattleRng)
        -> SkillSlot;
}

impl SkillChooser for AiSelector {
    fn choose_skill(
        &mut self,
        me: &Combatant,
        _opponent: &Combatant,
        rng: &mut BattleRng,
    ) -> SkillSlot {
        let decision = self.choose(me, rng);
        debug!(species = %me.species(), ?decision, "ai decision");
        decision.slot
    }
}

/// Plays back a fixed list of choices, then falls back to the basic attack
#[derive(Debug, Clone, Default)]
pub struct ScriptedChooser {
    queue: VecDeque<SkillSlot>,
}

impl ScriptedChooser {
    pub fn new(choices: impl IntoIterator<Item = SkillSlot>) -> Self {
        Self {
            queue: choices.into_iter().collect(),
        }
    }

    pub fn push(&mut self, slot: SkillSlot) {
        self.queue.push_back(slot);
    }
}

impl SkillChooser for ScriptedChooser {
    fn choose_skill(&mut self, _me: &Combatant, _opponent: &Combatant, _rng: &mut BattleRng) -> SkillSlot {
        self.queue.pop_front().unwrap_or(SkillSlot::Basic)
    }
}

/// Everything that happened in one round
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub round: u32,
    pub outcome: RoundOutcome,
    pub events: Vec<BattleEvent>,
}

/// A battle between the player's combatant and an enemy
#[derive(Debug)]
pub struct Battle {
    player: Combatant,
    enemy: Combatant,
    round: u32,
    round_limit: u32,
    outcome: RoundOutcome,
    log: BattleLog,
}

impl Battle {
    /// Set up a battle and fire both spawn hooks.
    ///
    /// The opening events (battle start, passive effects) are delivered with
    /// the first round's report.
    pub fn new(mut player: Combatant, mut enemy: Combatant) -> Self {
        let mut log = BattleLog::new();
        log.push(BattleEvent::BattleStarted {
            player: player.species().to_string(),
            enemy: enemy.species().to_string(),
        });
        player.spawn(Side::Player, &mut log);
        enemy.spawn(Side::Enemy, &mut log);
        info!(player = %player.species(), enemy = %enemy.species(), "battle started");

        Self {
            player,
            enemy,
            round: 0,
            round_limit: ROUND_LIMIT,
            outcome: RoundOutcome::InProgress,
            log,
        }
    }

    /// Override the round limit. Zero is rejected.
    pub fn with_round_limit(mut self, round_limit: u32) -> Result<Self, CombatError> {
        if round_limit == 0 {
            return Err(CombatError::InvalidRoundLimit(round_limit));
        }
        self.round_limit = round_limit;
        Ok(self)
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn enemy(&self) -> &Combatant {
        &self.enemy
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Rounds completed so far
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// Hand both combatants back to game flow
    pub fn into_combatants(self) -> (Combatant, Combatant) {
        (self.player, self.enemy)
    }

    /// Acting order for a round: higher speed first, player wins ties
    pub fn turn_order(&self) -> [Side; 2] {
        if self.player.stats().speed >= self.enemy.stats().speed {
            [Side::Player, Side::Enemy]
        } else {
            [Side::Enemy, Side::Player]
        }
    }

    /// Play one full round
    pub fn run_round(
        &mut self,
        player_chooser: &mut dyn SkillChooser,
        enemy_chooser: &mut dyn SkillChooser,
        rng: &mut BattleRng,
    ) -> Result<RoundReport, CombatError> {
        if self.is_over() {
            return Err(CombatError::BattleOver);
        }
        self.round += 1;

        self.player.awaken_effects();
        self.enemy.awaken_effects();

        let order = self.turn_order();
        self.log.push(BattleEvent::RoundStarted {
            round: self.round,
            first: order[0],
        });

        for side in order {
            match side {
                Side::Player => self.take_turn(side, player_chooser, rng),
                Side::Enemy => self.take_turn(side, enemy_chooser, rng),
            }
        }

        for side in [Side::Player, Side::Enemy] {
            let combatant = match side {
                Side::Player => &mut self.player,
                Side::Enemy => &mut self.enemy,
            };
            combatant.tick_cooldowns(side, &mut self.log);
            combatant.tick_effects(side, &mut self.log);
        }

        self.outcome = self.victory_check();
        if self.outcome.is_over() {
            info!(round = self.round, outcome = ?self.outcome, "battle over");
            self.log.push(BattleEvent::BattleEnded {
                round: self.round,
                outcome: self.outcome,
            });
        }

        Ok(RoundReport {
            round: self.round,
            outcome: self.outcome,
            events: self.log.drain(),
        })
    }

    /// Play rounds until the battle is over
    pub fn run_to_completion(
        &mut self,
        player_chooser: &mut dyn SkillChooser,
        enemy_chooser: &mut dyn SkillChooser,
        rng: &mut BattleRng,
    ) -> Result<Vec<RoundReport>, CombatError> {
        let mut reports = Vec::new();
        while !self.is_over() {
            reports.push(self.run_round(player_chooser, enemy_chooser, rng)?);
        }
        Ok(reports)
    }

    fn take_turn(&mut self, side: Side, chooser: &mut dyn SkillChooser, rng: &mut BattleRng) {
        let Battle {
            player, enemy, log, ..
        } = self;
        let (actor, opponent) = match side {
            Side::Player => (player, enemy),
            Side::Enemy => (enemy, player),
        };

        if !actor.is_alive() {
            log.push(BattleEvent::TurnSkipped { side });
            return;
        }

        actor.run_start_of_turn(side, log);

        let mut slot = chooser.choose_skill(actor, opponent, rng);
        if let Err(e) = damage::validate(actor, side, slot) {
            warn!(error = %e, "rejected skill choice, using basic attack");
            slot = SkillSlot::Basic;
        }

        if let Err(e) = damage::attack(actor, side, opponent, slot, log) {
            warn!(error = %e, "attack failed");
        }

        actor.run_end_of_turn(side, log);
    }

    fn victory_check(&self) -> RoundOutcome {
        match (self.player.is_alive(), self.enemy.is_alive()) {
            (true, true) if self.round >= self.round_limit => {
                warn!(round = self.round, "round limit reached");
                RoundOutcome::Draw
            }
            (true, true) => RoundOutcome::InProgress,
            (true, false) => RoundOutcome::PlayerWon,
            (false, true) => RoundOutcome::EnemyWon,
            (false, false) => RoundOutcome::Draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::Species;
    use crate::combat::effects::StatusEffect;
    use crate::combat::skills::{Skill, SkillEffect, SkillSet};
    use crate::combat::stats::{Element, ResistanceProfile, StatBlock, StatTarget};

    fn monster(health: f64, attack: f64, speed: f64, skills: SkillSet) -> Combatant {
        Combatant::new(
            Species::Emberling,
            1,
            StatBlock::new(health, attack, 0.0, speed),
            ResistanceProfile::new(),
            skills,
        )
        .unwrap()
    }

    fn first_actor(report: &RoundReport) -> Side {
        report
            .events
            .iter()
            .find_map(|e| match e {
                BattleEvent::SkillCast { attacker, .. } => Some(*attacker),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_faster_acts_first() {
        let mut battle = Battle::new(
            monster(50.0, 5.0, 3.0, SkillSet::new()),
            monster(50.0, 5.0, 8.0, SkillSet::new()),
        );
        assert_eq!(battle.turn_order(), [Side::Enemy, Side::Player]);

        let report = battle
            .run_round(&mut ScriptedChooser::default(), &mut ScriptedChooser::default(), &mut BattleRng::seeded(1))
            .unwrap();
        assert_eq!(first_actor(&report), Side::Enemy);
    }

    #[test]
    fn test_speed_tie_goes_to_player() {
        let battle = Battle::new(
            monster(50.0, 5.0, 5.0, SkillSet::new()),
            monster(50.0, 5.0, 5.0, SkillSet::new()),
        );
        assert_eq!(battle.turn_order(), [Side::Player, Side::Enemy]);
    }

    #[test]
    fn test_slow_reorders_next_round() {
        let undertow = Skill::active("Undertow", Element::Water, 1.0, 3).with_effect(
            SkillEffect::Afflict(StatusEffect::stat_shift("Undertow", StatTarget::Speed, 0.5, 2)),
        );
        let mut battle = Battle::new(
            monster(100.0, 5.0, 6.0, SkillSet::new().with(undertow)),
            monster(100.0, 5.0, 10.0, SkillSet::new()),
        );
        let mut rng = BattleRng::seeded(1);
        let mut player = ScriptedChooser::new([SkillSlot::Listed(0)]);
        let mut enemy = ScriptedChooser::default();

        battle.run_round(&mut player, &mut enemy, &mut rng).unwrap();
        // Dormant during the attaching round
        assert_eq!(battle.enemy().stats().speed, 10.0);
        assert_eq!(battle.turn_order(), [Side::Enemy, Side::Player]);

        // Round 2: enemy acts first (speed fixed at round start), then slows
        battle.run_round(&mut player, &mut enemy, &mut rng).unwrap();
        assert_eq!(battle.enemy().stats().speed, 5.0);
        assert_eq!(battle.turn_order(), [Side::Player, Side::Enemy]);

        // Round 3: shift expires at the end of the round, speed restored
        battle.run_round(&mut player, &mut enemy, &mut rng).unwrap();
        assert_eq!(battle.enemy().stats().speed, 10.0);
        assert!(!battle.enemy().has_effect("Undertow"));
    }

    #[test]
    fn test_dead_combatant_skips_turn() {
        let mut battle = Battle::new(
            monster(50.0, 100.0, 9.0, SkillSet::new()),
            monster(50.0, 100.0, 1.0, SkillSet::new()),
        );
        let report = battle
            .run_round(&mut ScriptedChooser::default(), &mut ScriptedChooser::default(), &mut BattleRng::seeded(1))
            .unwrap();

        assert_eq!(report.outcome, RoundOutcome::PlayerWon);
        assert!(report.events.contains(&BattleEvent::TurnSkipped { side: Side::Enemy }));
        assert_eq!(battle.player().health(), 50.0);
    }

    #[test]
    fn test_simultaneous_death_is_draw() {
        // Player kills the enemy, then dies to its own poison at end of turn
        let mut player = monster(1.0, 100.0, 9.0, SkillSet::new());
        let mut log = BattleLog::new();
        player.attach_effect(StatusEffect::poison("Venom", 0.1, 3), Side::Player, &mut log);

        let mut battle = Battle::new(player, monster(50.0, 1.0, 1.0, SkillSet::new()));
        let report = battle
            .run_round(&mut ScriptedChooser::default(), &mut ScriptedChooser::default(), &mut BattleRng::seeded(1))
            .unwrap();

        assert_eq!(report.outcome, RoundOutcome::Draw);
        assert!(!battle.player().is_alive());
        assert!(!battle.enemy().is_alive());
    }

    #[test]
    fn test_round_after_battle_over() {
        let mut battle = Battle::new(
            monster(50.0, 100.0, 9.0, SkillSet::new()),
            monster(50.0, 1.0, 1.0, SkillSet::new()),
        );
        let mut rng = BattleRng::seeded(1);
        let mut chooser = ScriptedChooser::default();
        battle.run_round(&mut chooser.clone(), &mut chooser, &mut rng).unwrap();

        let err = battle
            .run_round(&mut chooser.clone(), &mut chooser, &mut rng)
            .unwrap_err();
        assert_eq!(err, CombatError::BattleOver);
    }

    #[test]
    fn test_invalid_choice_falls_back_to_basic() {
        let mut battle = Battle::new(
            monster(50.0, 5.0, 9.0, SkillSet::new()),
            monster(50.0, 5.0, 1.0, SkillSet::new()),
        );
        let mut player = ScriptedChooser::new([SkillSlot::Listed(7)]);
        let report = battle
            .run_round(&mut player, &mut ScriptedChooser::default(), &mut BattleRng::seeded(1))
            .unwrap();

        assert!(report.events.contains(&BattleEvent::SkillCast {
            attacker: Side::Player,
            skill: crate::combat::skills::BASIC_ATTACK.to_string(),
        }));
        assert_eq!(battle.enemy().health(), 45.0);
    }

    #[test]
    fn test_round_limit_draw() {
        let regen = Skill::passive("Mend", StatusEffect::regeneration("Mend", 1.0, 1).permanent());
        let mut battle = Battle::new(
            monster(50.0, 1.0, 5.0, SkillSet::new().with(regen.clone())),
            monster(50.0, 1.0, 5.0, SkillSet::new().with(regen)),
        )
        .with_round_limit(5)
        .unwrap();

        let reports = battle
            .run_to_completion(&mut AiSelector::default(), &mut AiSelector::default(), &mut BattleRng::seeded(1))
            .unwrap();
        assert_eq!(reports.len(), 5);
        assert_eq!(battle.outcome(), RoundOutcome::Draw);
    }

    #[test]
    fn test_zero_round_limit_rejected() {
        let err = Battle::new(
            monster(50.0, 5.0, 5.0, SkillSet::new()),
            monster(50.0, 5.0, 5.0, SkillSet::new()),
        )
        .with_round_limit(0)
        .unwrap_err();
        assert_eq!(err, CombatError::InvalidRoundLimit(0));
    }

    #[test]
    fn test_passive_shift_counts_for_first_round() {
        let quick = Skill::passive(
            "Quickblood",
            StatusEffect::stat_shift("Quickblood", StatTarget::Speed, 2.0, 1).permanent(),
        );
        let battle = Battle::new(
            monster(50.0, 5.0, 4.0, SkillSet::new().with(quick)),
            monster(50.0, 5.0, 6.0, SkillSet::new()),
        );
        assert_eq!(battle.player().stats().speed, 8.0);
        assert_eq!(battle.turn_order(), [Side::Player, Side::Enemy]);
    }

    #[test]
    fn test_opening_events_in_first_report() {
        let aura = Skill::passive("Veil", StatusEffect::absorb("Veil", 0.1, 1).permanent());
        let mut battle = Battle::new(
            monster(50.0, 5.0, 5.0, SkillSet::new().with(aura)),
            monster(50.0, 5.0, 5.0, SkillSet::new()),
        );
        let report = battle
            .run_round(&mut ScriptedChooser::default(), &mut ScriptedChooser::default(), &mut BattleRng::seeded(1))
            .unwrap();

        assert!(matches!(report.events[0], BattleEvent::BattleStarted { .. }));
        assert_eq!(
            report.events[1],
            BattleEvent::EffectApplied {
                target: Side::Player,
                effect: "Veil".to_string(),
                duration: None,
            }
        );
    }
}
