//! Runtime services around the deterministic dungeon rules.
//!
//! This crate wires the content catalog, persistent storage and randomness
//! into a synchronous run service. Consumers embed [`RunService`] to create
//! characters, enter dungeons and resolve one player action per call; the
//! service owns the turn lock, the atomic write of every turn and the
//! rollback when something fails.
//!
//! Modules are organized by responsibility:
//! - [`service`] hosts the run service and its builder
//! - [`api`] exposes the error types downstream clients interact with
//! - [`repository`] provides the storage contract and its backends
//! - [`config`] and [`rng`] cover environment configuration and live dice
pub mod api;
pub mod config;
pub mod repository;
pub mod rng;
pub mod service;

pub use api::{Result, RuntimeError};
pub use config::RuntimeConfig;
pub use repository::{FileStore, GameStore, InMemoryStore, RepositoryError, WriteBatch};
pub use rng::{LiveRng, RngSource};
pub use service::{CharacterSheet, RunService, RunServiceBuilder, now_millis};
