//! Static skill loadout per species

use crate::combat::{Element, Skill, SkillEffect, SkillSet, StatTarget, StatusEffect};

use super::Species;

/// Fresh skill instances for a species. Every call builds new instances, so
/// two monsters of the same species never share cooldown state.
pub fn loadout(species: Species) -> SkillSet {
    match species {
        Species::Emberling => SkillSet::new()
            .with(
                Skill::passive(
                    "Kindled Heart",
                    StatusEffect::regeneration("Kindled Heart", 0.04, 1).permanent(),
                )
                .with_description("Recovers a little health every round."),
            )
            .with(
                Skill::active("Flame Burst", Element::Fire, 1.6, 2)
                    .with_description("A gout of flame."),
            )
            .with(
                Skill::active("Ignite Will", Element::Fire, 1.2, 3)
                    .with_description("Strike and stoke your own fury.")
                    .with_effect(SkillEffect::Empower(StatusEffect::stat_shift(
                        "Fury",
                        StatTarget::Attack,
                        1.3,
                        2,
                    ))),
            )
            .with(Skill::meta("Bask").with_description("Warm up in the sun. Does nothing in battle.")),
        Species::Tidecaller => SkillSet::new()
            .with(
                Skill::passive(
                    "Tidal Veil",
                    StatusEffect::absorb("Tidal Veil", 0.15, 1).permanent(),
                )
                .with_description("A film of water softens every blow."),
            )
            .with(
                Skill::active("Riptide", Element::Water, 1.5, 2)
                    .with_description("A crushing wave."),
            )
            .with(
                Skill::active("Undertow", Element::Water, 1.1, 3)
                    .with_description("Drags the target down, halving its speed.")
                    .with_effect(SkillEffect::Afflict(StatusEffect::stat_shift(
                        "Undertow",
                        StatTarget::Speed,
                        0.5,
                        2,
                    ))),
            ),
        Species::Stonehide => SkillSet::new()
            .with(
                Skill::passive(
                    "Bedrock",
                    StatusEffect::stat_shift("Bedrock", StatTarget::Defense, 1.2, 1).permanent(),
                )
                .with_description("Hardened hide."),
            )
            .with(
                Skill::active("Boulder Slam", Element::Physical, 1.8, 3)
                    .with_description("A slow, devastating slam."),
            )
            .with(
                Skill::active("Crush", Element::Physical, 1.2, 2)
                    .with_description("Cracks the target's guard.")
                    .with_effect(SkillEffect::Afflict(StatusEffect::exposed(
                        "Cracked", 1.25, 2,
                    ))),
            )
            .with(
                Skill::active("Harden", Element::Neutral, 0.5, 4)
                    .with_description("A weak jab that raises a stone shell.")
                    .with_effect(SkillEffect::Empower(StatusEffect::absorb("Stone Shell", 0.3, 2))),
            ),
        Species::Venomfang => SkillSet::new()
            .with(
                Skill::passive(
                    "Quickblood",
                    StatusEffect::stat_shift("Quickblood", StatTarget::Speed, 1.2, 1).permanent(),
                )
                .with_description("Always a step ahead."),
            )
            .with(
                Skill::active("Venom Bite", Element::Poison, 1.0, 2)
                    .with_description("Poisons the target for two rounds.")
                    .with_effect(SkillEffect::Afflict(StatusEffect::poison("Venom", 0.1, 2))),
            )
            .with(
                Skill::active("Toxic Lash", Element::Poison, 1.4, 1)
                    .with_description("A quick poisoned whip."),
            ),
    }
}
