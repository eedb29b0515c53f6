//! Procedural floor generation.
//!
//! Draw order is fixed (room count, room types, branches, then per-room
//! contents in room order) so a seeded random source replays the same floor.

use crate::combat::{EnemyInstance, tier_multiplier};
use crate::config::GameConfig;
use crate::env::{DungeonDefinition, DungeonOracle, EnemyOracle, EnemyTemplate, RngOracle};
use crate::floor::{Chest, FloorMap, Lock, RestSpot, Room, RoomType, Trap, TrapState};
use crate::state::{ENTRANCE_ROOM, EnemyId, RoomNumber};

/// Interior room type weights before depth adjustment.
const TYPE_WEIGHTS: [(RoomType, u32); 5] = [
    (RoomType::Standard, 45),
    (RoomType::Treasure, 15),
    (RoomType::Trap, 15),
    (RoomType::Rest, 10),
    (RoomType::Locked, 10),
];

const BRANCH_CHANCE: u32 = 20;
const STANDARD_SPAWN_CHANCE: u32 = 60;
const TRAP_SPAWN_CHANCE: u32 = 30;
const BOSS_ADDS_CHANCE: u32 = 50;
const TREASURE_LOCK_CHANCE: u32 = 30;
const STANDARD_CHEST_CHANCE: u32 = 15;
const MAX_REGULAR_SPAWNS: u32 = 2;

/// Extra trap/locked weight on deeper floors: +5 per floor beyond 2, at most +15.
pub fn depth_bonus(floor: u32) -> u32 {
    (floor.saturating_sub(2) * 5).min(15)
}

/// Room count for `floor`: `4 + floor / 2` with a variance of one either way.
fn room_count(rng: &mut (impl RngOracle + ?Sized), floor: u32) -> u32 {
    let base = 4 + floor / 2;
    let count = match rng.below(3) {
        0 => base - 1,
        1 => base,
        _ => base + 1,
    };
    count.max(GameConfig::MIN_ROOMS_PER_FLOOR)
}

fn interior_type(rng: &mut (impl RngOracle + ?Sized), floor: u32, number: RoomNumber) -> RoomType {
    let bonus = depth_bonus(floor);
    let weights: Vec<u32> = TYPE_WEIGHTS
        .iter()
        .map(|&(kind, weight)| match kind {
            // the only way out of the entrance is never barred
            RoomType::Locked if number == ENTRANCE_ROOM + 1 => 0,
            RoomType::Trap | RoomType::Locked => weight + bonus,
            _ => weight,
        })
        .collect();
    rng.weighted_index(&weights)
        .map_or(RoomType::Standard, |index| TYPE_WEIGHTS[index].0)
}

/// Regular spawn pool of a dungeon floor: `(template, weight)`.
fn spawn_pool<'c, C>(content: &'c C, dungeon: &DungeonDefinition, floor: u32) -> Vec<(&'c EnemyTemplate, u32)>
where
    C: EnemyOracle + DungeonOracle + ?Sized,
{
    content
        .spawn_rules(dungeon.id)
        .iter()
        .filter(|rule| rule.dungeon == dungeon.id && rule.applies_to_floor(floor) && rule.weight > 0)
        .filter_map(|rule| content.enemy(rule.enemy).map(|template| (template, rule.weight)))
        .filter(|(template, _)| !template.boss)
        .collect()
}

/// Boss for the dungeon: the first boss-flagged spawn rule for this floor,
/// else the template named by the completion predicate, else the first boss
/// template known.
fn pick_boss<'c, C>(content: &'c C, dungeon: &DungeonDefinition, floor: u32) -> Option<&'c EnemyTemplate>
where
    C: EnemyOracle + DungeonOracle + ?Sized,
{
    let from_rules = content
        .spawn_rules(dungeon.id)
        .iter()
        .filter(|rule| rule.applies_to_floor(floor))
        .filter_map(|rule| content.enemy(rule.enemy))
        .find(|template| template.boss);
    if from_rules.is_some() {
        return from_rules;
    }
    if let crate::env::CompletionPredicate::Boss(id) = dungeon.completion
        && let Some(template) = content.enemy(id)
    {
        return Some(template);
    }
    let mut bosses = content.bosses();
    bosses.sort_by_key(|template| template.id);
    bosses.into_iter().next()
}

struct Spawner<'c> {
    pool: Vec<(&'c EnemyTemplate, u32)>,
    multiplier: f64,
    enemies: Vec<EnemyInstance>,
}

impl<'c> Spawner<'c> {
    fn spawn(&mut self, template: &EnemyTemplate) -> Option<EnemyId> {
        let id = EnemyId(u16::try_from(self.enemies.len()).ok()?);
        self.enemies.push(EnemyInstance::spawn(id, template, self.multiplier));
        Some(id)
    }

    /// Spawns `count` weighted picks from the regular pool.
    fn spawn_weighted(&mut self, rng: &mut (impl RngOracle + ?Sized), count: u32) -> Vec<EnemyId> {
        let weights: Vec<u32> = self.pool.iter().map(|(_, weight)| *weight).collect();
        let mut spawned = Vec::new();
        for _ in 0..count {
            let Some(index) = rng.weighted_index(&weights) else {
                break;
            };
            let template = self.pool[index].0;
            if let Some(id) = self.spawn(template) {
                spawned.push(id);
            }
        }
        spawned
    }
}

/// Generate floor `floor` of `dungeon`.
///
/// Never fails: an empty spawn pool or a missing boss template just leaves
/// rooms empty.
pub fn generate_floor<C>(
    rng: &mut (impl RngOracle + ?Sized),
    content: &C,
    dungeon: &DungeonDefinition,
    floor: u32,
) -> FloorMap
where
    C: EnemyOracle + DungeonOracle + ?Sized,
{
    let floor = floor.max(1);
    let final_floor = dungeon.is_final_floor(floor);
    let count = room_count(rng, floor);

    let mut rooms: Vec<Room> = (1..=count)
        .map(|number| {
            if number == ENTRANCE_ROOM {
                Room::new(number, RoomType::Standard)
            } else if number == count {
                let mut last = Room::new(number, if final_floor { RoomType::Boss } else { RoomType::Standard });
                last.exit = !final_floor;
                last
            } else {
                Room::new(number, interior_type(rng, floor, number))
            }
        })
        .collect();
    rooms[0].accessible = true;

    // primary path
    for number in 1..count {
        link(&mut rooms, number, number + 1);
    }
    // branches skip ahead but never reach the terminal room
    for number in 2..count {
        if rng.chance(BRANCH_CHANCE) {
            let target = number + 2 + rng.below(2);
            if target < count {
                link(&mut rooms, number, target);
            }
        }
    }

    let (dc_min, dc_max) = dungeon.dc_range();
    let mut spawner = Spawner {
        pool: spawn_pool(content, dungeon, floor),
        multiplier: tier_multiplier(dungeon.scaling_factor, dungeon.tier),
        enemies: Vec::new(),
    };

    for room in rooms.iter_mut() {
        if room.number == ENTRANCE_ROOM || room.exit {
            continue;
        }
        match room.kind {
            RoomType::Standard => {
                if rng.chance(STANDARD_SPAWN_CHANCE) {
                    let spawns = 1 + rng.below(MAX_REGULAR_SPAWNS);
                    room.enemies = spawner.spawn_weighted(rng, spawns);
                }
                if rng.chance(STANDARD_CHEST_CHANCE) {
                    room.chest = Some(Chest {
                        locked: false,
                        lock_dc: dc_min,
                        opened: false,
                    });
                }
            }
            RoomType::Treasure => {
                let locked = rng.chance(TREASURE_LOCK_CHANCE);
                room.chest = Some(Chest {
                    locked,
                    lock_dc: rng.range(dc_min, dc_max),
                    opened: false,
                });
            }
            RoomType::Trap => {
                if rng.chance(TRAP_SPAWN_CHANCE) {
                    room.enemies = spawner.spawn_weighted(rng, 1);
                }
                if !dungeon.traps.is_empty() {
                    let index = rng.below(dungeon.traps.len() as u32) as usize;
                    room.trap = Some(Trap {
                        definition: dungeon.traps[index].clone(),
                        state: TrapState::Armed,
                    });
                }
            }
            RoomType::Rest => room.rest = Some(RestSpot::default()),
            RoomType::Locked => {
                room.lock = Some(Lock {
                    dc: rng.range(dc_min, dc_max),
                });
            }
            RoomType::Boss => {
                if let Some(boss) = pick_boss(content, dungeon, floor)
                    && let Some(id) = spawner.spawn(boss)
                {
                    room.enemies.push(id);
                }
                if rng.chance(BOSS_ADDS_CHANCE) {
                    let adds = 1 + rng.below(MAX_REGULAR_SPAWNS);
                    room.enemies.extend(spawner.spawn_weighted(rng, adds));
                }
            }
        }
    }

    FloorMap {
        floor,
        final_floor,
        rooms,
        enemies: spawner.enemies,
    }
}

fn link(rooms: &mut [Room], a: RoomNumber, b: RoomNumber) {
    let (ia, ib) = (a as usize - 1, b as usize - 1);
    if !rooms[ia].connections.contains(&b) {
        rooms[ia].connections.push(b);
    }
    if !rooms[ib].connections.contains(&a) {
        rooms[ib].connections.push(a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, SpawnRule, TrapDefinition};
    use crate::state::{DungeonId, EnemyTemplateId};

    struct Content {
        enemies: Vec<EnemyTemplate>,
        rules: Vec<SpawnRule>,
        dungeon: DungeonDefinition,
    }

    impl EnemyOracle for Content {
        fn enemy(&self, id: EnemyTemplateId) -> Option<&EnemyTemplate> {
            self.enemies.iter().find(|e| e.id == id)
        }

        fn bosses(&self) -> Vec<&EnemyTemplate> {
            self.enemies.iter().filter(|e| e.boss).collect()
        }
    }

    impl DungeonOracle for Content {
        fn dungeon(&self, id: DungeonId) -> Option<&DungeonDefinition> {
            (self.dungeon.id == id).then_some(&self.dungeon)
        }

        fn spawn_rules(&self, _: DungeonId) -> &[SpawnRule] {
            &self.rules
        }
    }

    fn content() -> Content {
        let rat = EnemyTemplate::new(EnemyTemplateId(1), "Rat", 4, 2);
        let mut king = EnemyTemplate::new(EnemyTemplateId(9), "Rat King", 30, 6);
        king.boss = true;
        let mut dungeon = DungeonDefinition::new(DungeonId(1), "Sewers", 3, 2);
        dungeon.scaling_factor = 1.5;
        dungeon.traps = vec![TrapDefinition {
            name: "Spikes".into(),
            detect_dc: 12,
            damage: 4,
            damage_type: Default::default(),
            status: None,
        }];
        Content {
            enemies: vec![rat, king],
            rules: vec![
                SpawnRule::new(DungeonId(1), EnemyTemplateId(1), 5),
                SpawnRule::new(DungeonId(1), EnemyTemplateId(9), 1),
            ],
            dungeon,
        }
    }

    #[test]
    fn generated_floors_hold_graph_invariants() {
        let content = content();
        for seed in 0..300 {
            for floor in 1..=3 {
                let map = generate_floor(&mut PcgRng::seeded(seed), &content, &content.dungeon, floor);
                let count = map.rooms.len() as u32;

                assert!(count >= GameConfig::MIN_ROOMS_PER_FLOOR);
                assert!((3 + floor / 2..=5 + floor / 2).contains(&count));
                assert!(map.is_connected(), "seed {seed} floor {floor} disconnected");

                let entrance = map.room(1).unwrap();
                assert!(entrance.accessible);
                assert_eq!(entrance.kind, RoomType::Standard);
                assert!(entrance.enemies.is_empty());
                assert_ne!(map.room(2).unwrap().kind, RoomType::Locked);
                assert!(map.rooms.iter().skip(1).all(|room| !room.accessible));

                let last = map.room(count).unwrap();
                assert_eq!(last.connections, vec![count - 1], "terminal room has one way in");
                let bosses = map.rooms.iter().filter(|r| r.kind == RoomType::Boss).count();
                if floor == 3 {
                    assert_eq!(last.kind, RoomType::Boss);
                    assert_eq!(bosses, 1);
                    assert!(map.exit_room().is_none());
                    let boss = map.enemy(last.enemies[0]).unwrap();
                    assert!(boss.boss);
                } else {
                    assert!(last.exit);
                    assert_eq!(bosses, 0);
                }

                for room in &map.rooms {
                    assert_eq!(room.kind == RoomType::Locked, room.lock.is_some());
                    if room.kind == RoomType::Standard {
                        assert!(room.enemies.len() <= 2);
                    }
                    for id in &room.enemies {
                        let enemy = map.enemy(*id).unwrap();
                        assert!(room.kind == RoomType::Boss || !enemy.boss);
                    }
                }
            }
        }
    }

    #[test]
    fn enemies_scale_with_tier() {
        let content = content();
        for seed in 0..50 {
            let map = generate_floor(&mut PcgRng::seeded(seed), &content, &content.dungeon, 1);
            for rat in map.enemies.iter() {
                // 4 × 1.5 and 2 × 1.5
                assert_eq!((rat.max_hp, rat.damage), (6, 3));
            }
        }
    }

    #[test]
    fn empty_pool_yields_empty_rooms() {
        let mut content = content();
        content.rules.clear();
        content.enemies.clear();
        let map = generate_floor(&mut PcgRng::seeded(4), &content, &content.dungeon, 3);
        assert!(map.enemies.is_empty());
        assert!(map.is_connected());
    }

    #[test]
    fn deeper_floors_favour_traps_and_locks() {
        assert_eq!(depth_bonus(1), 0);
        assert_eq!(depth_bonus(2), 0);
        assert_eq!(depth_bonus(3), 5);
        assert_eq!(depth_bonus(9), 15);
    }
}
