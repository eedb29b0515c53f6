use crate::combat::DamageType;
use crate::env::{GoldRange, StatusInfliction};
use crate::state::{DungeonId, EnemyTemplateId};

pub trait DungeonOracle {
    fn dungeon(&self, id: DungeonId) -> Option<&DungeonDefinition>;

    /// Spawn rules registered for `dungeon`, in declaration order.
    fn spawn_rules(&self, dungeon: DungeonId) -> &[SpawnRule];
}

/// Declarative dungeon definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DungeonDefinition {
    pub id: DungeonId,
    pub name: String,
    /// Number of floors; the last one holds the boss.
    pub floors: u32,
    /// Difficulty tier (1-based); drives stat scaling and completion bonus.
    pub tier: u32,
    pub dc_min: u32,
    pub dc_max: u32,
    /// Gold required to enter.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entry_cost: u32,
    /// Per-tier growth of enemy hp and damage.
    #[cfg_attr(feature = "serde", serde(default = "default_scaling"))]
    pub scaling_factor: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub completion: CompletionPredicate,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traps: Vec<TrapDefinition>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub chest_gold: GoldRange,
}

#[cfg(feature = "serde")]
fn default_scaling() -> f64 {
    1.0
}

impl DungeonDefinition {
    pub fn new(id: DungeonId, name: impl Into<String>, floors: u32, tier: u32) -> Self {
        Self {
            id,
            name: name.into(),
            floors,
            tier,
            dc_min: 10,
            dc_max: 15,
            entry_cost: 0,
            scaling_factor: 1.0,
            completion: CompletionPredicate::AnyBoss,
            traps: Vec::new(),
            chest_gold: GoldRange::default(),
        }
    }

    /// DC range with bounds in order.
    pub fn dc_range(&self) -> (u32, u32) {
        (self.dc_min.min(self.dc_max), self.dc_min.max(self.dc_max))
    }

    /// Midpoint of the DC range; used for free-form skill checks.
    pub fn base_dc(&self) -> u32 {
        let (low, high) = self.dc_range();
        low + (high - low) / 2
    }

    pub fn is_final_floor(&self, floor: u32) -> bool {
        floor >= self.floors.max(1)
    }
}

/// What counts as beating the dungeon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompletionPredicate {
    /// Any boss-flagged enemy dies.
    #[default]
    AnyBoss,
    /// A specific boss template dies.
    Boss(EnemyTemplateId),
}

impl CompletionPredicate {
    pub fn is_satisfied_by(&self, template: EnemyTemplateId, is_boss: bool) -> bool {
        match self {
            Self::AnyBoss => is_boss,
            Self::Boss(required) => *required == template,
        }
    }
}

/// Trap placed in trap rooms.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrapDefinition {
    pub name: String,
    /// Perception DC to notice it.
    pub detect_dc: u32,
    pub damage: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<StatusInfliction>,
}

/// Weighted enemy spawn entry for a dungeon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnRule {
    pub dungeon: DungeonId,
    pub enemy: EnemyTemplateId,
    pub weight: u32,
    #[cfg_attr(feature = "serde", serde(default = "default_min_floor"))]
    pub min_floor: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_floor: Option<u32>,
}

#[cfg(feature = "serde")]
fn default_min_floor() -> u32 {
    1
}

impl SpawnRule {
    pub fn new(dungeon: DungeonId, enemy: EnemyTemplateId, weight: u32) -> Self {
        Self {
            dungeon,
            enemy,
            weight,
            min_floor: 1,
            max_floor: None,
        }
    }

    pub fn applies_to_floor(&self, floor: u32) -> bool {
        floor >= self.min_floor && self.max_floor.is_none_or(|max| floor <= max)
    }
}
