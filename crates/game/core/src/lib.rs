//! Deterministic rules of the dungeon crawl.
//!
//! `game-core` turns a free-form player action into mechanically resolved
//! outcomes: dice and skill checks, combat, loot, movement and floor
//! generation. It has no I/O, no clock and no global randomness; every draw
//! goes through an injected [`env::RngOracle`] so a scripted source replays
//! any turn exactly. All run mutation flows through [`engine::GameEngine`],
//! and supporting crates depend on the types re-exported here.
pub mod combat;
pub mod config;
pub mod dice;
pub mod engine;
pub mod env;
pub mod error;
pub mod floor;
pub mod intent;
pub mod loot;
pub mod state;

pub use combat::{DamageType, EnemyInstance, Resistances};
pub use config::GameConfig;
pub use dice::{CheckOutcome, Skill, SkillCheckResult, SkillLevels, Stats};
pub use engine::{GameEngine, Movement, TrapReport, TurnError, TurnNote, TurnSummary};
pub use env::{
    ContentOracle, DungeonDefinition, DungeonOracle, EnemyOracle, EnemyTemplate, Env,
    ItemDefinition, ItemKind, ItemOracle, LootOracle, LootRule, LootSource, OracleError, PcgRng,
    RngOracle, SequenceRng, SpawnRule, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use floor::{FloorMap, Room, RoomType, generate_floor};
pub use intent::{Intent, IntentKind, classify};
pub use loot::{LootDrop, resolve_loot};
pub use state::{
    Character, CharacterId, DungeonId, EnemyId, EnemyTemplateId, GameState, Inventory, ItemId,
    RoomNumber, Run, RunId, RunStatus,
};
