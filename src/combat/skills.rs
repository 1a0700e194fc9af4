//! Skills and cooldowns
//!
//! A skill is an immutable definition plus a per-instance cooldown counter.
//! Every combatant owns its own skill instances, so cooldowns never leak
//! between combatants that share a species.

use serde::{Deserialize, Serialize};

use super::effects::StatusEffect;
use super::stats::Element;

/// Name of the always-available fallback skill
pub const BASIC_ATTACK: &str = "Basic Attack";

/// Skill category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    /// Usable in battle
    Active,
    /// Applies once when the combatant spawns
    Passive,
    /// Listed in the skill menu but never castable in battle
    Meta,
}

/// What a skill does beyond dealing damage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "effect", rename_all = "snake_case")]
pub enum SkillEffect {
    /// Plain damage
    Strike,
    /// On cast: attach the effect to the attacker
    Empower(StatusEffect),
    /// On hit: attach the effect to the defender
    Afflict(StatusEffect),
    /// On spawn: attach the effect to the owner (passives)
    Aura(StatusEffect),
}

/// A skill instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub description: String,
    pub category: SkillCategory,
    pub element: Element,
    pub power: f64,
    pub base_cooldown: u32,
    pub effect: SkillEffect,
    #[serde(default)]
    remaining_cooldown: u32,
}

impl Skill {
    /// Create a new active skill
    pub fn active(name: impl Into<String>, element: Element, power: f64, base_cooldown: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: SkillCategory::Active,
            element,
            power: power.max(0.0),
            base_cooldown,
            effect: SkillEffect::Strike,
            remaining_cooldown: 0,
        }
    }

    /// Create a passive skill that attaches `effect` on spawn
    pub fn passive(name: impl Into<String>, effect: StatusEffect) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: SkillCategory::Passive,
            element: Element::Neutral,
            power: 0.0,
            base_cooldown: 0,
            effect: SkillEffect::Aura(effect),
            remaining_cooldown: 0,
        }
    }

    /// Create a menu-only skill
    pub fn meta(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: SkillCategory::Meta,
            element: Element::Neutral,
            power: 0.0,
            base_cooldown: 0,
            effect: SkillEffect::Strike,
            remaining_cooldown: 0,
        }
    }

    /// The zero-cooldown fallback attack
    pub fn basic_attack() -> Self {
        Self::active(BASIC_ATTACK, Element::Neutral, 1.0, 0)
            .with_description("A plain strike. Always ready.")
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effect = effect;
        self
    }

    pub fn remaining_cooldown(&self) -> u32 {
        self.remaining_cooldown
    }

    pub fn is_ready(&self) -> bool {
        self.remaining_cooldown == 0
    }

    /// Whether the skill can be cast in battle right now
    pub fn is_castable(&self) -> bool {
        self.category == SkillCategory::Active && self.is_ready()
    }

    /// Put the skill on cooldown after use.
    ///
    /// The extra round means a skill with a 1-round cooldown still sits out
    /// the whole next round (the tick at the end of the casting round eats
    /// one).
    pub fn start_cooldown(&mut self) {
        if self.base_cooldown > 0 {
            self.remaining_cooldown = self.base_cooldown + 1;
        }
    }

    pub fn tick_cooldown(&mut self) {
        self.remaining_cooldown = self.remaining_cooldown.saturating_sub(1);
    }

    pub fn reset_cooldown(&mut self) {
        self.remaining_cooldown = 0;
    }

    /// Effect to attach to the attacker when cast
    pub fn on_cast(&self) -> Option<&StatusEffect> {
        match &self.effect {
            SkillEffect::Empower(effect) => Some(effect),
            _ => None,
        }
    }

    /// Effect to attach to the defender on hit
    pub fn on_hit(&self) -> Option<&StatusEffect> {
        match &self.effect {
            SkillEffect::Afflict(effect) => Some(effect),
            _ => None,
        }
    }

    /// Effect to attach to the owner on spawn
    pub fn on_spawn(&self) -> Option<&StatusEffect> {
        match &self.effect {
            SkillEffect::Aura(effect) if self.category == SkillCategory::Passive => Some(effect),
            _ => None,
        }
    }
}

/// Reference to a skill within a [`SkillSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkillSlot {
    /// The fallback basic attack
    Basic,
    /// Index into the skill list
    Listed(usize),
}

/// Skills owned by one combatant
#[derive(Debug, Clone, PartialEq)]
pub struct SkillSet {
    basic: Skill,
    passive: Option<Skill>,
    skills: Vec<Skill>,
}

impl Default for SkillSet {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillSet {
    /// Create a skill set holding only the basic attack
    pub fn new() -> Self {
        Self {
            basic: Skill::basic_attack(),
            passive: None,
            skills: Vec::new(),
        }
    }

    /// Add a skill. A passive replaces any previous passive.
    pub fn add(&mut self, skill: Skill) {
        match skill.category {
            SkillCategory::Passive => {
                if let Some(old) = self.passive.replace(skill) {
                    tracing::warn!(passive = %old.name, "replacing passive skill");
                }
            }
            SkillCategory::Active | SkillCategory::Meta => self.skills.push(skill),
        }
    }

    pub fn with(mut self, skill: Skill) -> Self {
        self.add(skill);
        self
    }

    pub fn basic(&self) -> &Skill {
        &self.basic
    }

    pub fn passive(&self) -> Option<&Skill> {
        self.passive.as_ref()
    }

    /// Active and meta skills in loadout order
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn get(&self, slot: SkillSlot) -> Option<&Skill> {
        match slot {
            SkillSlot::Basic => Some(&self.basic),
            SkillSlot::Listed(i) => self.skills.get(i),
        }
    }

    pub fn get_mut(&mut self, slot: SkillSlot) -> Option<&mut Skill> {
        match slot {
            SkillSlot::Basic => Some(&mut self.basic),
            SkillSlot::Listed(i) => self.skills.get_mut(i),
        }
    }

    /// Find a skill by name
    pub fn find(&self, name: &str) -> Option<SkillSlot> {
        if self.basic.name == name {
            return Some(SkillSlot::Basic);
        }
        self.skills
            .iter()
            .position(|s| s.name == name)
            .map(SkillSlot::Listed)
    }

    /// Active listed skills that are ready, excluding the basic attack
    pub fn ready_active(&self) -> Vec<(SkillSlot, &Skill)> {
        self.skills
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_castable())
            .map(|(i, s)| (SkillSlot::Listed(i), s))
            .collect()
    }

    /// Everything castable right now, basic attack first
    pub fn ready_skills(&self) -> Vec<(SkillSlot, &Skill)> {
        let mut ready = vec![(SkillSlot::Basic, &self.basic)];
        ready.extend(self.ready_active());
        ready
    }

    /// Tick every cooldown once. Returns skills whose counter changed.
    pub fn tick_cooldowns(&mut self) -> Vec<(String, u32)> {
        let mut changed = Vec::new();
        for skill in self.skills.iter_mut() {
            if skill.remaining_cooldown > 0 {
                skill.tick_cooldown();
                changed.push((skill.name.clone(), skill.remaining_cooldown));
            }
        }
        changed
    }

    pub fn reset_cooldowns(&mut self) {
        self.basic.reset_cooldown();
        for skill in self.skills.iter_mut() {
            skill.reset_cooldown();
        }
    }
}
