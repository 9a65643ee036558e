//! System-wide constants for the TrustMarket game server.

/// Cash every player starts a game with (whole currency units).
pub const STARTING_CASH: i64 = 2_000;

/// Default number of rounds per game.
pub const DEFAULT_TOTAL_ROUNDS: u32 = 10;

/// BLIND_BET phase duration in seconds.
pub const BLIND_BET_SECS: u32 = 20;

/// ROLE_ASSIGN phase duration in seconds.
pub const ROLE_ASSIGN_SECS: u32 = 5;

/// MARKET_CHAT phase duration in seconds.
pub const MARKET_CHAT_SECS: u32 = 45;

/// CLOSING phase duration in seconds.
pub const CLOSING_SECS: u32 = 10;

/// CALCULATION phase duration in seconds.
pub const CALCULATION_SECS: u32 = 15;

/// Tick interval of the per-session phase driver in seconds.
pub const TICK_INTERVAL_SECS: u64 = 1;

/// Market-crash penalty, percent of each player's cash.
pub const MARKET_CRASH_PENALTY_PCT: u32 = 10;

/// Commission a Normal Trader withholds from investor winnings, percent.
pub const NORMAL_COMMISSION_PCT: u32 = 20;

/// Fraction of an Oracle's own stake redistributed to its investors, percent.
pub const ORACLE_SHARE_PCT: u32 = 70;

/// Hard deadline for the external question provider, in seconds.
pub const QUESTION_TIMEOUT_SECS: u64 = 10;

/// Default topic sent to the question provider.
pub const DEFAULT_QUESTION_TOPIC: &str = "Economics & Fraud";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "TrustMarket";
