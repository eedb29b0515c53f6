//! Shared fixtures for the runtime integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use game_content::ContentCatalog;
use game_core::combat::EnemyInstance;
use game_core::env::{ConsumableEffect, GoldRange};
use game_core::floor::Lock;
use game_core::{
    Character, CharacterId, DungeonDefinition, DungeonId, EnemyId, EnemyTemplate,
    EnemyTemplateId, FloorMap, Inventory, ItemDefinition, ItemId, ItemKind, LootRule, LootSource,
    Room, RoomType, Run, RunId, SpawnRule, Stats,
};
use runtime::{
    GameStore, InMemoryStore, RepositoryError, RngSource, RunService, RuntimeConfig, WriteBatch,
};

pub const POTION: ItemId = ItemId(1);
pub const LOCKPICK: ItemId = ItemId(2);
pub const GARNET: ItemId = ItemId(3);

pub const RAT: EnemyTemplateId = EnemyTemplateId(1);
pub const KING: EnemyTemplateId = EnemyTemplateId(2);

/// Three floors, cheap to enter.
pub const CRYPT: DungeonId = DungeonId(1);
/// Costs more than a new character owns.
pub const VAULT: DungeonId = DungeonId(2);

pub fn catalog() -> ContentCatalog {
    let mut rat = EnemyTemplate::new(RAT, "Rat", 4, 2);
    rat.xp = 5;
    rat.gold = GoldRange::new(1, 3);
    let mut king = EnemyTemplate::new(KING, "Rat King", 12, 4);
    king.boss = true;
    king.xp = 50;
    king.gold = GoldRange::new(10, 10);

    let mut crypt = DungeonDefinition::new(CRYPT, "Crypt", 3, 1);
    crypt.entry_cost = 20;
    crypt.dc_min = 10;
    crypt.dc_max = 14;
    let mut vault = DungeonDefinition::new(VAULT, "Vault", 5, 3);
    vault.entry_cost = 500;

    ContentCatalog::new()
        .with_item(ItemDefinition::new(
            POTION,
            "Healing Potion",
            ItemKind::Consumable {
                effect: ConsumableEffect::Heal(10),
            },
        ))
        .with_item(ItemDefinition::new(LOCKPICK, "Lockpick", ItemKind::Lockpick))
        .with_item(ItemDefinition::new(GARNET, "Garnet", ItemKind::Trinket))
        .with_enemy(rat)
        .with_enemy(king)
        .with_dungeon(crypt)
        .with_dungeon(vault)
        .with_spawn_rule(SpawnRule::new(CRYPT, RAT, 4))
        .with_spawn_rule(SpawnRule::new(CRYPT, KING, 1))
        .with_loot_rule(LootRule::guaranteed(LootSource::Enemy, RAT.0, GARNET))
        .with_loot_rule(LootRule::weighted(LootSource::Search, CRYPT.0, POTION, 1))
        .with_loot_rule(LootRule::guaranteed(LootSource::Chest, CRYPT.0, LOCKPICK))
}

pub fn service_over<S: GameStore>(store: S) -> RunService<S> {
    RunService::builder()
        .store(store)
        .content(catalog())
        .config(RuntimeConfig::default())
        .rng(RngSource::Seeded(7))
        .build()
        .expect("service should build")
}

pub fn service() -> RunService<InMemoryStore> {
    service_over(InMemoryStore::new())
}

/// Strong fighter: STR 16 (+3), CON 14 (22 max HP).
pub fn fighter() -> Stats {
    Stats::new(16, 12, 14, 10, 12, 10)
}

/// Character standing in a fresh crypt run.
pub fn enter_crypt<S: GameStore>(service: &RunService<S>, name: &str) -> (CharacterId, Run) {
    let character = service
        .create_character(name, Some(fighter()))
        .expect("character should be created");
    let run = service
        .enter_dungeon(character.id, CRYPT)
        .expect("crypt should be open");
    (character.id, run)
}

fn link(rooms: &mut [Room], a: u32, b: u32) {
    rooms[a as usize - 1].connections.push(b);
    rooms[b as usize - 1].connections.push(a);
}

fn entrance() -> Room {
    let mut room = Room::new(1, RoomType::Standard);
    room.accessible = true;
    room.visited = true;
    room
}

/// Replace the generated floor of `run` with a hand-built one.
pub fn plant_floor<S: GameStore>(service: &RunService<S>, run: RunId, floor: FloorMap) {
    service
        .store()
        .commit(WriteBatch::new().floor(run, floor))
        .expect("floor should be stored");
}

/// Empty room 1 next to an empty room 2.
pub fn corridor() -> FloorMap {
    let mut rooms = vec![entrance(), Room::new(2, RoomType::Standard)];
    link(&mut rooms, 1, 2);
    FloorMap {
        floor: 1,
        final_floor: false,
        rooms,
        enemies: Vec::new(),
    }
}

/// Room 2 is the exit down to floor 2.
pub fn stairwell() -> FloorMap {
    let mut floor = corridor();
    floor.rooms[1].exit = true;
    floor
}

/// Room 2 is locked behind a DC 12 lock.
pub fn locked_door() -> FloorMap {
    let mut floor = corridor();
    floor.rooms[1].kind = RoomType::Locked;
    floor.rooms[1].lock = Some(Lock { dc: 12 });
    floor
}

/// Final floor whose room 2 holds a one-hit-point Rat King.
pub fn throne_room(content: &ContentCatalog) -> FloorMap {
    use game_core::EnemyOracle;

    let mut floor = corridor();
    floor.floor = 3;
    floor.final_floor = true;
    floor.rooms[1].kind = RoomType::Boss;
    floor.rooms[1].enemies = vec![EnemyId(0)];
    let king = content.enemy(KING).expect("king is in the catalog");
    let mut boss = EnemyInstance::spawn(EnemyId(0), king, 1.0);
    boss.hp = 1;
    floor.enemies = vec![boss];
    floor
}

pub fn stored_run<S: GameStore>(service: &RunService<S>, run: RunId) -> Run {
    service
        .store()
        .run(run)
        .expect("store readable")
        .expect("run exists")
}

pub fn stored_character<S: GameStore>(service: &RunService<S>, id: CharacterId) -> Character {
    service
        .store()
        .character(id)
        .expect("store readable")
        .expect("character exists")
}

/// In-memory store whose commits can be made to fail, and whose open-run
/// lookup can be made to return an older copy, on demand.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    fail_commits: AtomicBool,
    lagging_open_run: Mutex<Option<Run>>,
}

impl FlakyStore {
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    /// Serve `run` from `open_run` until cleared, as a reader that looked
    /// before another request committed would see it.
    pub fn lag_open_run(&self, run: Option<Run>) {
        *self.lagging_open_run.lock().unwrap() = run;
    }
}

impl GameStore for FlakyStore {
    fn next_character_id(&self) -> runtime::repository::Result<CharacterId> {
        self.inner.next_character_id()
    }

    fn next_run_id(&self) -> runtime::repository::Result<RunId> {
        self.inner.next_run_id()
    }

    fn character(&self, id: CharacterId) -> runtime::repository::Result<Option<Character>> {
        self.inner.character(id)
    }

    fn inventory(&self, character: CharacterId) -> runtime::repository::Result<Inventory> {
        self.inner.inventory(character)
    }

    fn run(&self, id: RunId) -> runtime::repository::Result<Option<Run>> {
        self.inner.run(id)
    }

    fn open_run(&self, character: CharacterId) -> runtime::repository::Result<Option<Run>> {
        if let Some(run) = self.lagging_open_run.lock().unwrap().clone()
            && run.character == character
        {
            return Ok(Some(run));
        }
        self.inner.open_run(character)
    }

    fn floor(&self, run: RunId) -> runtime::repository::Result<Option<FloorMap>> {
        self.inner.floor(run)
    }

    fn processing_runs(&self) -> runtime::repository::Result<Vec<Run>> {
        self.inner.processing_runs()
    }

    fn try_begin_turn(
        &self,
        run: RunId,
        action: &str,
        now_millis: i64,
    ) -> runtime::repository::Result<bool> {
        self.inner.try_begin_turn(run, action, now_millis)
    }

    fn release_turn(&self, run: RunId) -> runtime::repository::Result<bool> {
        self.inner.release_turn(run)
    }

    fn commit(&self, batch: WriteBatch) -> runtime::repository::Result<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(RepositoryError::Io(std::io::Error::other("disk full")));
        }
        self.inner.commit(batch)
    }
}
