//! Using, equipping and unequipping items.

use crate::dice::Skill;
use crate::engine::{Turn, TurnError, TurnNote, add_effect};
use crate::env::{ConsumableEffect, ItemDefinition, ItemKind};
use crate::state::{GameState, ItemId, RoomFlags, StatusEffect, StatusEffectKind};

impl Turn<'_> {
    pub(super) fn use_item(&mut self, item: Option<ItemId>) -> Result<(), TurnError> {
        let Some(id) = item.filter(|&id| self.state.inventory.has(id)) else {
            self.summary.note(TurnNote::ItemMissing);
            return Ok(());
        };
        let def = self.env.item(id)?;

        match &def.kind {
            ItemKind::Weapon { .. } | ItemKind::Armor { .. } => self.equip(def)?,
            ItemKind::Consumable { effect } => self.consume(def, *effect),
            ItemKind::Lockpick => self.skill_check(Skill::Lockpicking, None),
            ItemKind::Quest | ItemKind::Trinket => self.summary.note(TurnNote::NoEffect),
        }
        Ok(())
    }

    /// Equip `def`, taking off whatever occupies its slot.
    fn equip(&mut self, def: &ItemDefinition) -> Result<(), TurnError> {
        if self.state.inventory.is_equipped(def.id) {
            self.summary.note(TurnNote::NoEffect);
            return Ok(());
        }
        let slot = def.slot();
        let equipped: Vec<ItemId> = self.state.inventory.equipped().collect();
        for other in equipped {
            if self.env.item(other)?.slot() == slot {
                self.state.inventory.set_equipped(other, false);
                self.summary.equipment.push((other, false));
            }
        }
        self.state.inventory.set_equipped(def.id, true);
        self.summary.equipment.push((def.id, true));
        Ok(())
    }

    fn consume(&mut self, def: &ItemDefinition, effect: ConsumableEffect) {
        let config = self.env.config();
        let GameState {
            character,
            run,
            inventory,
            ..
        } = &mut *self.state;

        match effect {
            ConsumableEffect::Heal(amount) => {
                character.heal(amount);
            }
            ConsumableEffect::Cure => {
                let cured = run.effects.remove_where(StatusEffectKind::is_curable);
                self.summary.effects_removed.extend(cured);
            }
            ConsumableEffect::Light => {
                let torch = StatusEffect::new(
                    StatusEffectKind::Illuminated,
                    config.torch_duration,
                    config.torch_perception_bonus,
                    def.name.clone(),
                );
                add_effect(&mut run.effects, &mut self.summary, torch);
                run.room_state.flags.insert(RoomFlags::LIT_TORCH);
            }
            ConsumableEffect::Bless { bonus, duration } => {
                let blessing = StatusEffect::new(StatusEffectKind::Blessed, duration, bonus, def.name.clone());
                add_effect(&mut run.effects, &mut self.summary, blessing);
            }
            ConsumableEffect::Regenerate {
                per_action,
                duration,
            } => {
                let regen = StatusEffect::new(
                    StatusEffectKind::Regenerating,
                    duration,
                    per_action,
                    def.name.clone(),
                );
                add_effect(&mut run.effects, &mut self.summary, regen);
            }
        }

        let used = inventory.remove(def.id, 1);
        self.summary.items_used.push((def.id, used));
    }

    /// Unequip `item`, or everything when `None`.
    pub(super) fn unequip(&mut self, item: Option<ItemId>) {
        let inventory = &mut self.state.inventory;
        let targets: Vec<ItemId> = match item {
            Some(id) if inventory.is_equipped(id) => vec![id],
            Some(_) => Vec::new(),
            None => inventory.equipped().collect(),
        };
        if targets.is_empty() {
            self.summary.note(TurnNote::NothingEquipped);
        }
        for id in targets {
            inventory.set_equipped(id, false);
            self.summary.equipment.push((id, false));
        }
    }
}
