//! # trustmarket-engine
//!
//! The orchestration plane: everything between a transport's commands and
//! the pure settlement engine.
//!
//! - [`SessionRegistry`] — concurrency-safe map of live sessions
//! - [`GameBus`] / [`BroadcastBus`] — the outbound messaging boundary
//! - [`GameEngine`] — the command surface (create, join, start, stake,
//!   invest, answer, stop)
//! - [`driver`] — the per-session phase timer that advances rounds
//!
//! One tokio task per live session ticks every second under that session's
//! lock; command handlers take the same lock, so all mutation of one
//! session is serialized while different sessions stay fully parallel.
//! Question fetching and settlement run as separate spawned tasks that
//! re-lock to post results, so an external call can never delay a tick.

pub mod bus;
pub mod driver;
pub mod engine;
pub mod registry;
pub mod roles;

pub use bus::{BroadcastBus, GameBus};
pub use engine::GameEngine;
pub use registry::SessionRegistry;
