//! arena - headless battle runner
//!
//! Runs one AI-vs-AI battle and prints the event stream.

use std::path::PathBuf;

use anyhow::Result;
use arena::balance::Species;
use arena::combat::{BattleEvent, RoundOutcome};
use arena::config::ArenaConfig;
use arena::Arena;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Turn-based monster battle simulator
#[derive(Parser, Debug)]
#[command(name = "arena", version, about = "Simulate a monster battle")]
struct Args {
    /// TOML config file (balancing table and battle tuning)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Player species
    #[arg(long, default_value = "emberling")]
    player: Species,

    /// Enemy species (drawn at random when omitted)
    #[arg(long)]
    enemy: Option<Species>,

    /// Level for both monsters
    #[arg(short, long, default_value_t = 1)]
    level: u32,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "arena=info".into()),
    );
    if args.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let mut config = ArenaConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.battle.seed = Some(seed);
    }

    let mut arena = Arena::new(config);
    let enemy_species = match args.enemy {
        Some(species) => species,
        None => arena.draw_species(),
    };

    let player = arena.spawn(args.player, args.level)?;
    let enemy = arena.spawn(enemy_species, args.level)?;
    let record = arena.run_ai_battle(player, enemy)?;

    for report in &record.rounds {
        for event in &report.events {
            if args.json {
                println!("{}", event.to_json_line());
            } else if let Some(line) = describe(event) {
                println!("[round {}] {}", report.round, line);
            }
        }
    }

    let verdict = match record.outcome {
        RoundOutcome::PlayerWon => format!("{} wins", args.player),
        RoundOutcome::EnemyWon => format!("{} wins", enemy_species),
        RoundOutcome::Draw => "draw".to_string(),
        RoundOutcome::InProgress => "unfinished".to_string(),
    };
    if !args.json {
        println!("{} after {} rounds", verdict, record.rounds.len());
    }

    Ok(())
}

/// Short text for the events worth showing in plain mode
fn describe(event: &BattleEvent) -> Option<String> {
    let line = match event {
        BattleEvent::SkillCast { attacker, skill } => format!("{} uses {}", attacker, skill),
        BattleEvent::DamageApplied {
            target,
            amount,
            health_after,
        } => format!("{} takes {:.1} ({:.1} left)", target, amount, health_after),
        BattleEvent::EffectApplied { target, effect, .. } => format!("{} gains {}", target, effect),
        BattleEvent::EffectDamage {
            target,
            effect,
            amount,
            ..
        } => format!("{} suffers {:.1} from {}", target, amount, effect),
        BattleEvent::EffectHeal {
            target,
            effect,
            amount,
            ..
        } => format!("{} recovers {:.1} from {}", target, amount, effect),
        BattleEvent::EffectExpired { target, effect } => format!("{}'s {} wears off", target, effect),
        BattleEvent::TurnSkipped { side } => format!("{} is down", side),
        _ => return None,
    };
    Some(line)
}
