//! arena - turn-based monster battle engine
//!
//! Two monsters trade skill-based attacks across rounds until one falls.
//! The engine computes damage, runs status effects and cooldowns, picks
//! skills for AI-controlled monsters and emits a structured event stream
//! for whatever presentation layer sits on top.

pub mod balance;
pub mod combat;
pub mod config;

use balance::{BalanceError, Species};
use combat::{AiSelector, Battle, BattleRng, Combatant, CombatError, RoundOutcome, RoundReport};
use config::ArenaConfig;
use tracing::info;

/// A finished battle with both combatants handed back
#[derive(Debug)]
pub struct BattleRecord {
    pub outcome: RoundOutcome,
    pub rounds: Vec<RoundReport>,
    pub player: Combatant,
    pub enemy: Combatant,
}

/// Entry point for game flow: balancing data, tuning and the shared RNG
pub struct Arena {
    config: ArenaConfig,
    rng: BattleRng,
}

impl Arena {
    /// Create an arena. Seeds from the config when a seed is set.
    pub fn new(config: ArenaConfig) -> Self {
        let rng = match config.battle.seed {
            Some(seed) => BattleRng::seeded(seed),
            None => BattleRng::from_os(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// The shared generator; every random draw must go through it
    pub fn rng_mut(&mut self) -> &mut BattleRng {
        &mut self.rng
    }

    /// Build a combatant from the balancing table
    pub fn spawn(&self, species: Species, level: u32) -> Result<Combatant, BalanceError> {
        balance::spawn(species, level, &self.config.balance)
    }

    /// Draw a random enemy species
    pub fn draw_species(&mut self) -> Species {
        self.rng.draw_species()
    }

    /// Start a battle with the configured round limit
    pub fn battle(&self, player: Combatant, enemy: Combatant) -> Result<Battle, CombatError> {
        Battle::new(player, enemy).with_round_limit(self.config.battle.round_limit)
    }

    pub fn ai(&self) -> AiSelector {
        self.config.battle.ai_selector()
    }

    /// Run a whole battle with the AI choosing for both sides
    pub fn run_ai_battle(
        &mut self,
        player: Combatant,
        enemy: Combatant,
    ) -> Result<BattleRecord, CombatError> {
        let mut battle = self.battle(player, enemy)?;
        let mut player_ai = self.ai();
        let mut enemy_ai = self.ai();

        let rounds = battle.run_to_completion(&mut player_ai, &mut enemy_ai, &mut self.rng)?;
        let outcome = battle.outcome();
        info!(rounds = rounds.len(), ?outcome, "ai battle finished");

        let (player, enemy) = battle.into_combatants();
        Ok(BattleRecord {
            outcome,
            rounds,
            player,
            enemy,
        })
    }
}
