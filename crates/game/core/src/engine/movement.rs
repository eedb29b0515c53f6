//! Movement, floor transitions and traps.

use crate::dice::{DamageRoll, Skill, roll_damage, skill_check};
use crate::engine::{Movement, TrapReport, Turn, TurnError, add_effect, armor_of, combatant};
use crate::floor::{FloorMap, Room, RoomType, TrapState, generate_floor};
use crate::state::{ENTRANCE_ROOM, GameState, RoomFlags, RoomNumber, RoomState, StatusEffect};

impl Turn<'_> {
    /// Move to `requested`, or to the engine's pick when `None`.
    ///
    /// Entering an unvisited room clears the room left behind when no enemy
    /// lives there, which opens its unlocked neighbours. Going back to a
    /// visited room leaves it as it was.
    pub(super) fn move_to(&mut self, requested: Option<RoomNumber>) -> Result<(), TurnError> {
        let GameState { run, floor, .. } = &mut *self.state;
        if run.room_state.in_combat {
            return Err(TurnError::CombatActive);
        }
        let from = run.room;
        let current = floor.room(from).ok_or(TurnError::RoomNotFound(from))?;

        let clearable = !current.cleared && floor.living_enemies(from).is_empty();
        let opening = if clearable {
            floor.opened_by_clearing(from)
        } else {
            Vec::new()
        };
        let to = match requested {
            Some(to) => to,
            None => default_target(floor, from, &opening).ok_or(TurnError::NoAccessibleRoom)?,
        };

        let mut opened = Vec::new();
        if clearable && floor.room(to).is_some_and(|room| !room.visited) {
            opened = floor.clear_room(from);
            run.stats.rooms_cleared += 1;
        }
        let to = validate_target(floor, from, to)?;

        let descend = !floor.final_floor && floor.room(to).is_some_and(|room| room.exit);
        let mut movement = Movement {
            from,
            to,
            opened,
            new_floor: None,
        };

        if descend {
            let next = floor.floor + 1;
            self.descend(next);
            movement.to = ENTRANCE_ROOM;
            movement.new_floor = Some(next);
            self.summary.movement = Some(movement);
        } else {
            self.summary.movement = Some(movement);
            self.enter_room(to, Some(from));
        }
        Ok(())
    }

    /// Generate floor `next` and stand in its entrance.
    fn descend(&mut self, next: u32) {
        let content = self.env.content();
        let GameState { run, floor, .. } = &mut *self.state;
        *floor = generate_floor(&mut *self.rng, content, self.dungeon, next);
        run.floor = next;
        run.room = ENTRANCE_ROOM;
        run.context.reset();
        run.stats.floors_descended += 1;
        if let Some(entrance) = floor.room_mut(ENTRANCE_ROOM) {
            entrance.visited = true;
        }
        run.room_state = RoomState::entered(Vec::new(), None, run.room_state.flags);
    }

    /// Put the player in `to`: combat starts if enemies live there and an
    /// armed trap gets one concealed perception check.
    pub(super) fn enter_room(&mut self, to: RoomNumber, from: Option<RoomNumber>) {
        let GameState { run, floor, .. } = &mut *self.state;
        let living = floor.living_enemies(to);
        run.room = to;
        run.room_state = RoomState::entered(living, from, run.room_state.flags);

        if let Some(room) = floor.room_mut(to) {
            room.visited = true;
            if room.kind == RoomType::Boss && run.room_state.in_combat {
                self.entered_boss = true;
            }
        }
        self.spring_trap(to);
    }

    fn spring_trap(&mut self, number: RoomNumber) {
        let content = self.env.content();
        let config = self.env.config();
        let GameState {
            character,
            run,
            floor,
            inventory,
        } = &mut *self.state;
        let Some(trap) = floor
            .room_mut(number)
            .and_then(|room| room.trap.as_mut())
            .filter(|trap| trap.is_armed())
        else {
            return;
        };

        let player = combatant(
            character,
            &run.effects,
            armor_of(inventory, content),
            config.default_crit_range,
        );
        let check = skill_check(&mut *self.rng, player.check(Skill::Perception, trap.definition.detect_dc));

        let mut damage = 0;
        let mut inflicted = None;
        if check.passed {
            trap.state = TrapState::Detected;
        } else {
            trap.state = TrapState::Triggered;
            let roll = roll_damage(&mut *self.rng, DamageRoll::new(trap.definition.damage));
            damage = character.take_damage(roll);
            self.summary.lose_hp(damage);
            if let Some(status) = trap.definition.status
                && self.rng.chance(status.chance_percent)
            {
                let effect = StatusEffect::new(
                    status.kind,
                    status.duration,
                    status.magnitude,
                    trap.definition.name.clone(),
                );
                inflicted = Some(status.kind);
                add_effect(&mut run.effects, &mut self.summary, effect);
            }
        }
        run.room_state.flags.insert(RoomFlags::TRAP_RESOLVED);

        self.summary.trap = Some(TrapReport {
            name: trap.definition.name.clone(),
            check,
            state: trap.state,
            damage,
            inflicted,
        });
    }
}

fn validate_target(floor: &FloorMap, from: RoomNumber, to: RoomNumber) -> Result<RoomNumber, TurnError> {
    let current = floor.room(from).ok_or(TurnError::RoomNotFound(from))?;
    let target = floor.room(to).ok_or(TurnError::RoomNotFound(to))?;
    if !current.connects_to(to) {
        return Err(TurnError::RoomNotConnected { from, to });
    }
    if target.is_locked() {
        return Err(TurnError::RoomLocked(to));
    }
    if !target.accessible {
        return Err(TurnError::RoomInaccessible(to));
    }
    Ok(to)
}

/// Lowest uncleared connection, else the highest one. Candidates are the
/// accessible connections plus those the pending clear would open.
fn default_target(floor: &FloorMap, from: RoomNumber, opening: &[RoomNumber]) -> Option<RoomNumber> {
    let candidates: Vec<&Room> = floor
        .room(from)?
        .connections
        .iter()
        .filter_map(|&n| floor.room(n))
        .filter(|next| next.accessible || opening.contains(&next.number))
        .collect();
    candidates
        .iter()
        .filter(|room| !room.cleared)
        .map(|room| room.number)
        .min()
        .or_else(|| candidates.iter().map(|room| room.number).max())
}
