//! Loot resolution against declarative drop tables.
//!
//! Resolution is side-effect free: it returns drop records and leaves applying
//! them to an inventory to the engine.

mod resolver;

pub use resolver::{LootDrop, LootContext, resolve_loot};
