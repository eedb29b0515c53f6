use crate::combat::{DamageType, Resistances};
use crate::config::GameConfig;
use crate::dice::Skill;
use crate::state::{EnemyTemplateId, StatusEffectKind};

pub trait EnemyOracle {
    fn enemy(&self, id: EnemyTemplateId) -> Option<&EnemyTemplate>;

    /// Every template flagged as a boss.
    fn bosses(&self) -> Vec<&EnemyTemplate>;
}

/// Declarative enemy definition. Instances are scaled copies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyTemplate {
    pub id: EnemyTemplateId,
    pub name: String,
    pub hp: u32,
    /// Base damage of the basic attack.
    pub damage: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: u32,
    /// DC the player defends against on a basic attack.
    #[cfg_attr(feature = "serde", serde(default = "default_attack_dc"))]
    pub attack_dc: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Resistances,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold: GoldRange,
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: bool,
}

#[cfg(feature = "serde")]
fn default_attack_dc() -> u32 {
    GameConfig::DEFAULT_ATTACK_DC
}

impl EnemyTemplate {
    /// Minimal template for tests and generated fillers.
    pub fn new(id: EnemyTemplateId, name: impl Into<String>, hp: u32, damage: u32) -> Self {
        Self {
            id,
            name: name.into(),
            hp,
            damage,
            armor: 0,
            attack_dc: GameConfig::DEFAULT_ATTACK_DC,
            damage_type: DamageType::Physical,
            resistances: Resistances::default(),
            abilities: Vec::new(),
            gold: GoldRange::default(),
            xp: 0,
            boss: false,
        }
    }
}

/// Special enemy ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub name: String,
    /// Base damage; `None` uses the enemy's basic damage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<u32>,
    /// `None` uses the enemy's damage type.
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: Option<DamageType>,
    /// DC of the player's defensive check.
    pub dc: u32,
    /// Enemy rounds before the ability can be used again.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u32,
    /// Uses per fight; `None` is unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub charges: Option<u32>,
    /// Only usable at or below this percent of max HP.
    #[cfg_attr(feature = "serde", serde(default))]
    pub hp_threshold_percent: Option<u32>,
    /// Skill the player defends with.
    #[cfg_attr(feature = "serde", serde(default = "default_defense"))]
    pub defense: Skill,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<StatusInfliction>,
}

#[cfg(feature = "serde")]
fn default_defense() -> Skill {
    Skill::Dodge
}

impl AbilityDefinition {
    pub fn new(name: impl Into<String>, dc: u32) -> Self {
        Self {
            name: name.into(),
            damage: None,
            damage_type: None,
            dc,
            cooldown: 0,
            charges: None,
            hp_threshold_percent: None,
            defense: Skill::Dodge,
            status: None,
        }
    }
}

/// Chance to attach a status effect when the player fails to defend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusInfliction {
    pub kind: StatusEffectKind,
    pub chance_percent: u32,
    pub duration: u32,
    pub magnitude: u32,
}

/// Inclusive gold reward range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoldRange {
    pub min: u32,
    pub max: u32,
}

impl GoldRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}
