//! # trustmarket-types
//!
//! Shared types, errors, and configuration for the **TrustMarket** game server.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`SessionId`], [`PlayerId`], [`QuestionId`]
//! - **Roles**: [`PublicRole`], [`HiddenRole`]
//! - **Phase model**: [`GamePhase`]
//! - **Data model**: [`Session`], [`Player`], [`Question`]
//! - **Public views**: [`SessionSnapshot`], [`PlayerView`], [`QuestionView`]
//! - **Settlement ledger**: [`LedgerEntry`], [`SettlementReason`]
//! - **Broadcast payloads**: [`GameEvent`] plus topic builders
//! - **Configuration**: [`GameConfig`]
//! - **Errors**: [`TrustmarketError`] with `TM_ERR_` prefix codes

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod ledger;
pub mod phase;
pub mod player;
pub mod question;
pub mod role;
pub mod session;

// Re-export all primary types at crate root for ergonomic imports:
//   use trustmarket_types::{Session, Player, GamePhase, LedgerEntry, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use ledger::*;
pub use phase::*;
pub use player::*;
pub use question::*;
pub use role::*;
pub use session::*;

// Constants are accessed via `trustmarket_types::constants::FOO`
// (not re-exported to avoid name collisions).
