//! Plain-text presentation of resolved turns.
//!
//! Only restates what the summary records; nothing here rolls or decides.

use std::fmt::Write as _;

use game_content::ContentCatalog;
use game_core::{ItemId, ItemOracle, SkillCheckResult, TurnSummary};
use runtime::CharacterSheet;

fn item_name(content: &ContentCatalog, item: ItemId) -> String {
    content
        .item(item)
        .map_or_else(|| item.to_string(), |def| def.name.clone())
}

fn check_line(check: &SkillCheckResult) -> String {
    let bonus = check.total - check.roll as i32;
    format!(
        "{} check: d20 {} {:+} = {} vs DC {} -> {}",
        check.skill, check.roll, bonus, check.total, check.dc, check.outcome
    )
}

pub fn turn(summary: &TurnSummary, content: &ContentCatalog) -> String {
    let mut out = format!("-- turn {} ({}) --\n", summary.turn, summary.intent.kind());
    let tick = &summary.status_tick;
    if tick.damage > 0 || tick.healing > 0 {
        let _ = writeln!(out, "effects: -{} hp, +{} hp", tick.damage, tick.healing);
    }
    for check in &summary.skill_checks {
        let _ = writeln!(out, "{}", check_line(check));
    }
    for attack in &summary.attacks {
        let _ = writeln!(out, "attack on {}: {}", attack.target_name, check_line(&attack.check));
        if let Some(damage) = &attack.damage {
            let _ = write!(out, "  {} damage, {} hp left", damage.dealt, damage.remaining_hp);
            if damage.defeat.is_some() {
                out.push_str(", defeated");
            }
            out.push('\n');
        }
    }
    if let Some(movement) = &summary.movement {
        match movement.new_floor {
            Some(floor) => {
                let _ = writeln!(out, "descended to floor {floor}");
            }
            None => {
                let _ = writeln!(out, "moved from room {} to room {}", movement.from, movement.to);
            }
        }
    }
    if let Some(trap) = &summary.trap {
        let _ = writeln!(out, "{}: {:?}, {} damage", trap.name, trap.state, trap.damage);
    }
    for enemy in &summary.enemy_turns {
        let attack = enemy.ability.as_deref().unwrap_or("attack");
        let _ = writeln!(out, "{} uses {}: {} damage", enemy.name, attack, enemy.damage);
    }
    if summary.opportunity_damage > 0 {
        let _ = writeln!(out, "parting blows: {} damage", summary.opportunity_damage);
    }
    for drop in &summary.loot {
        let _ = writeln!(out, "found {} x{}", item_name(content, drop.item), drop.quantity);
    }
    for (item, quantity) in &summary.items_lost {
        let _ = writeln!(out, "lost {} x{}", item_name(content, *item), quantity);
    }
    if summary.gold_gained > 0 {
        let _ = writeln!(out, "+{} gold", summary.gold_gained);
    }
    if summary.gold_lost > 0 {
        let _ = writeln!(out, "-{} gold", summary.gold_lost);
    }
    for note in &summary.notes {
        let _ = writeln!(out, "note: {note:?}");
    }
    let _ = write!(out, "hp {} -> {}", summary.hp_before, summary.hp_after);
    if summary.died {
        out.push_str("\nYou died.");
    }
    if summary.completed {
        let _ = write!(out, "\nDungeon complete! Bonus {} gold.", summary.completion_bonus);
    }
    out
}

pub fn sheet(sheet: &CharacterSheet, content: &ContentCatalog) -> String {
    let hero = &sheet.character;
    let stats = &hero.stats;
    let mut out = format!(
        "{} ({}) hp {}/{} gold {} xp {}\nSTR {} DEX {} CON {} INT {} WIS {} CHA {}\n",
        hero.name,
        hero.id,
        hero.hp,
        hero.max_hp,
        hero.gold,
        hero.xp,
        stats.strength,
        stats.dexterity,
        stats.constitution,
        stats.intelligence,
        stats.wisdom,
        stats.charisma
    );
    if sheet.inventory.entries().is_empty() {
        out.push_str("inventory: empty\n");
    }
    for entry in sheet.inventory.entries() {
        let marker = if entry.equipped { " (equipped)" } else { "" };
        let _ = writeln!(out, "  {} x{}{}", item_name(content, entry.item), entry.quantity, marker);
    }
    match &sheet.run {
        Some(run) => {
            let _ = write!(
                out,
                "{} in {}: floor {}, room {}, {}",
                run.id, run.dungeon, run.floor, run.room, run.status
            );
            if run.room_state.in_combat {
                out.push_str(", in combat");
            }
        }
        None => out.push_str("no open run"),
    }
    out
}

#[cfg(test)]
mod tests {
    use game_core::{Intent, Movement};

    use super::*;

    #[test]
    fn movement_and_gold_are_listed() {
        let mut summary = TurnSummary::new(4, "go to room 2", 18);
        summary.intent = Intent::Move { room: Some(2) };
        summary.movement = Some(Movement {
            from: 1,
            to: 2,
            opened: vec![],
            new_floor: None,
        });
        summary.gold_gained = 3;

        let text = turn(&summary, &ContentCatalog::new());

        assert_eq!(
            text,
            "-- turn 4 (move) --\nmoved from room 1 to room 2\n+3 gold\nhp 18 -> 18"
        );
    }
}
