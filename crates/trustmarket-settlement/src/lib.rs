//! # trustmarket-settlement
//!
//! **Pure settlement engine for TrustMarket.**
//!
//! Takes a session snapshot at the end of a round and produces an ordered
//! ledger of cash deltas. It has:
//!
//! - **Zero side effects**: no broadcasts, no timers, no session mutation
//! - **Deterministic output**: players are processed in id order, so the
//!   same snapshot always yields the same ledger
//! - **Floored balances**: no entry ever takes a player below zero
//!
//! The orchestrator applies a ledger back onto the live session with
//! [`apply_ledger`] and publishes it on the results topic.

pub mod apply;
pub mod crash;
pub mod round;

pub use apply::apply_ledger;
pub use crash::market_crash;
pub use round::settle_round;
