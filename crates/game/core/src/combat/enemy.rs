//! Enemy instances spawned from templates.

use crate::combat::{DamageType, Resistances};
use crate::env::{AbilityDefinition, EnemyTemplate, GoldRange};
use crate::state::{EnemyId, EnemyTemplateId};

/// Runtime state of one special ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityState {
    pub definition: AbilityDefinition,
    pub cooldown_remaining: u32,
    /// `None` is unlimited.
    pub charges_remaining: Option<u32>,
}

impl AbilityState {
    pub fn new(definition: AbilityDefinition) -> Self {
        Self {
            charges_remaining: definition.charges,
            definition,
            cooldown_remaining: 0,
        }
    }

    /// Off cooldown, charged, and within its HP trigger.
    pub fn is_ready(&self, hp: u32, max_hp: u32) -> bool {
        self.cooldown_remaining == 0
            && self.charges_remaining != Some(0)
            && self
                .definition
                .hp_threshold_percent
                .is_none_or(|pct| u64::from(hp) * 100 <= u64::from(max_hp) * u64::from(pct))
    }

    /// Starts the cooldown and spends a charge.
    pub fn consume(&mut self) {
        self.cooldown_remaining = self.definition.cooldown;
        if let Some(charges) = self.charges_remaining.as_mut() {
            *charges = charges.saturating_sub(1);
        }
    }
}

/// Scaled copy of an [`EnemyTemplate`] owned by one room of one floor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyInstance {
    pub id: EnemyId,
    pub template: EnemyTemplateId,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub damage: u32,
    pub armor: u32,
    pub attack_dc: u32,
    pub damage_type: DamageType,
    pub resistances: Resistances,
    pub abilities: Vec<AbilityState>,
    pub gold: GoldRange,
    pub xp: u32,
    pub boss: bool,
    pub alive: bool,
}

impl EnemyInstance {
    /// Spawns `template` with hp and damage multiplied by `multiplier`.
    /// Armor is not scaled.
    pub fn spawn(id: EnemyId, template: &EnemyTemplate, multiplier: f64) -> Self {
        let hp = scale(template.hp, multiplier).max(1);
        Self {
            id,
            template: template.id,
            name: template.name.clone(),
            hp,
            max_hp: hp,
            damage: scale(template.damage, multiplier),
            armor: template.armor,
            attack_dc: template.attack_dc,
            damage_type: template.damage_type,
            resistances: template.resistances.clone(),
            abilities: template.abilities.iter().cloned().map(AbilityState::new).collect(),
            gold: template.gold,
            xp: template.xp,
            boss: template.boss,
            alive: true,
        }
    }

    /// Indices of abilities usable this round.
    pub fn ready_abilities(&self) -> Vec<usize> {
        self.abilities
            .iter()
            .enumerate()
            .filter(|(_, ability)| ability.is_ready(self.hp, self.max_hp))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn tick_cooldowns(&mut self) {
        for ability in &mut self.abilities {
            ability.cooldown_remaining = ability.cooldown_remaining.saturating_sub(1);
        }
    }
}

/// `round(base × multiplier)`.
pub fn scale(base: u32, multiplier: f64) -> u32 {
    let scaled = (f64::from(base) * multiplier).round();
    if scaled <= 0.0 {
        0
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// `scaling_factor ^ (tier - 1)`; tiers below 1 count as 1.
pub fn tier_multiplier(scaling_factor: f64, tier: u32) -> f64 {
    let exponent = i32::try_from(tier.saturating_sub(1)).unwrap_or(i32::MAX);
    scaling_factor.powi(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ogre() -> EnemyTemplate {
        let mut template = EnemyTemplate::new(EnemyTemplateId(3), "Ogre", 20, 6);
        template.armor = 2;
        let mut slam = AbilityDefinition::new("Slam", 13);
        slam.cooldown = 2;
        slam.charges = Some(1);
        let mut rage = AbilityDefinition::new("Rage", 12);
        rage.hp_threshold_percent = Some(50);
        template.abilities = vec![slam, rage];
        template
    }

    #[test]
    fn tier_scaling_is_exponential_and_skips_armor() {
        let ogre = EnemyInstance::spawn(EnemyId(0), &ogre(), tier_multiplier(1.5, 3));
        assert_eq!(ogre.max_hp, 45);
        assert_eq!(ogre.damage, 14);
        assert_eq!(ogre.armor, 2);
        assert_eq!(tier_multiplier(1.5, 1), 1.0);
    }

    #[test]
    fn abilities_respect_cooldown_charges_and_threshold() {
        let mut ogre = EnemyInstance::spawn(EnemyId(0), &ogre(), 1.0);
        assert_eq!(ogre.ready_abilities(), vec![0]);

        ogre.abilities[0].consume();
        assert!(ogre.ready_abilities().is_empty());
        ogre.tick_cooldowns();
        ogre.tick_cooldowns();
        // out of charges even though the cooldown is over
        assert!(ogre.ready_abilities().is_empty());

        ogre.hp = 10;
        assert_eq!(ogre.ready_abilities(), vec![1]);
    }
}
