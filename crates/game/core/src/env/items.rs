use crate::combat::DamageType;
use crate::dice::Skill;
use crate::state::ItemId;

pub trait ItemOracle {
    fn item(&self, id: ItemId) -> Option<&ItemDefinition>;
}

/// Item definition with common fields and type-specific data.
///
/// # Design: Base + Kind Pattern
///
/// - Base struct holds common fields (id, name, value)
/// - `kind` enum holds type-specific data (weapon stats, consumable effects, etc.)
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    /// Shop value in gold.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: u32,
}

impl ItemDefinition {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            value: 0,
        }
    }

    /// Quest items are always lost on death.
    pub fn is_quest(&self) -> bool {
        matches!(self.kind, ItemKind::Quest)
    }

    pub fn slot(&self) -> Option<EquipSlot> {
        match self.kind {
            ItemKind::Weapon { .. } => Some(EquipSlot::Weapon),
            ItemKind::Armor { .. } => Some(EquipSlot::Armor),
            _ => None,
        }
    }
}

/// Equipment slot; one equipped item per slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EquipSlot {
    Weapon,
    Armor,
}

/// Item type with type-specific data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Equippable weapon.
    Weapon {
        damage_bonus: u32,
        /// Melee or ranged.
        skill: Skill,
        /// Overrides the default crit range.
        #[cfg_attr(feature = "serde", serde(default))]
        crit_range: Option<u32>,
        #[cfg_attr(feature = "serde", serde(default))]
        damage_type: DamageType,
    },

    /// Equippable armor; flat reduction of incoming damage.
    Armor { armor: u32 },

    /// Consumed on use.
    Consumable { effect: ConsumableEffect },

    /// Consumed by a passing lockpicking check on a locked room.
    Lockpick,

    /// Bound to the run; always lost on death.
    Quest,

    /// No mechanical use.
    Trinket,
}

/// Effect of using a consumable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConsumableEffect {
    /// Restore HP.
    Heal(u32),
    /// Remove damage-over-time effects and weakness.
    Cure,
    /// Light a torch: perception perk for the configured duration.
    Light,
    /// Bonus to every check.
    Bless { bonus: u32, duration: u32 },
    /// Heal over time.
    Regenerate { per_action: u32, duration: u32 },
}
