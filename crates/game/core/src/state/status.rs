//! Timed status effects on the player.
//!
//! Effects count down in processed actions, not wall time. Each processed
//! action ticks every effect exactly once before the action resolves; an
//! effect is removed on the tick that brings its duration to zero.

use arrayvec::ArrayVec;
use strum::{Display, EnumString};

use crate::config::GameConfig;
use crate::dice::Skill;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffectKind {
    // ========================================================================
    // Damage over time
    // ========================================================================
    Poisoned,
    Burning,
    Bleeding,

    // ========================================================================
    // Buffs
    // ========================================================================
    /// HP recovery over time.
    Regenerating,
    /// Light source: perception bonus.
    Illuminated,
    /// Bonus to every check.
    Blessed,

    // ========================================================================
    // Debuffs
    // ========================================================================
    /// Penalty to melee and ranged attacks.
    Weakened,
}

impl StatusEffectKind {
    pub const fn deals_damage(self) -> bool {
        matches!(self, Self::Poisoned | Self::Burning | Self::Bleeding)
    }

    /// Removed by a cure consumable.
    pub const fn is_curable(self) -> bool {
        matches!(self, Self::Poisoned | Self::Burning | Self::Bleeding | Self::Weakened)
    }

    /// Signed check modifier this effect contributes to `skill`.
    pub fn perk_for(self, skill: Skill, magnitude: u32) -> i32 {
        let magnitude = magnitude as i32;
        match self {
            Self::Illuminated if skill == Skill::Perception => magnitude,
            Self::Blessed => magnitude,
            Self::Weakened if matches!(skill, Skill::Melee | Skill::Ranged) => -magnitude,
            _ => 0,
        }
    }
}

/// A single active effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    /// Remaining processed actions.
    pub remaining: u32,
    /// Damage or healing per tick, or check bonus for perks.
    pub magnitude: u32,
    /// What applied it (ability, trap, or item name).
    pub source: String,
}

impl StatusEffect {
    pub fn new(kind: StatusEffectKind, remaining: u32, magnitude: u32, source: impl Into<String>) -> Self {
        Self {
            kind,
            remaining,
            magnitude,
            source: source.into(),
        }
    }
}

/// Aggregate of one status tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTick {
    pub damage: u32,
    pub healing: u32,
    pub expired: Vec<StatusEffectKind>,
}

/// Active status effects, bounded by [`GameConfig::MAX_STATUS_EFFECTS`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an effect.
    ///
    /// An effect of the same kind is refreshed instead: the longer duration
    /// and the larger magnitude win. When the list is full the new effect is
    /// dropped and `false` is returned.
    pub fn add(&mut self, effect: StatusEffect) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.remaining = existing.remaining.max(effect.remaining);
            existing.magnitude = existing.magnitude.max(effect.magnitude);
            existing.source = effect.source;
            return true;
        }
        self.effects.try_push(effect).is_ok()
    }

    pub fn has(&self, kind: StatusEffectKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Removes every effect matching `predicate`, returning the removed kinds.
    pub fn remove_where(&mut self, predicate: impl Fn(StatusEffectKind) -> bool) -> Vec<StatusEffectKind> {
        let removed: Vec<_> = self
            .effects
            .iter()
            .filter(|e| predicate(e.kind))
            .map(|e| e.kind)
            .collect();
        self.effects.retain(|e| !predicate(e.kind));
        removed
    }

    /// Advances every effect by one action.
    ///
    /// Damage-over-time and regeneration apply their magnitude, every
    /// duration drops by one, and effects reaching zero are removed.
    pub fn tick(&mut self) -> StatusTick {
        let mut tick = StatusTick::default();
        for effect in self.effects.iter_mut() {
            if effect.kind.deals_damage() {
                tick.damage += effect.magnitude;
            } else if effect.kind == StatusEffectKind::Regenerating {
                tick.healing += effect.magnitude;
            }
            effect.remaining = effect.remaining.saturating_sub(1);
            if effect.remaining == 0 {
                tick.expired.push(effect.kind);
            }
        }
        self.effects.retain(|e| e.remaining > 0);
        tick
    }

    /// Sum of perk modifiers for a check with `skill`.
    pub fn perk_bonus(&self, skill: Skill) -> i32 {
        self.effects
            .iter()
            .map(|e| e.kind.perk_for(skill, e.magnitude))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
