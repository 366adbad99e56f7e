//! Shared types for the wagering ledger.
//!
//! These form the data model used by the store, service, and API modules,
//! so none of them need to depend on each other for plain data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Balance granted to a user the first time a placement is attempted for
/// an unknown user id. Auto-provisioning policy, not an error path.
pub const DEFAULT_STARTING_BALANCE: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Bet
// ---------------------------------------------------------------------------

/// A single wager. Immutable after placement except for `status`, which
/// moves from `Pending` to a terminal value exactly once at settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    /// Decimal odds; payout on a win is `amount * odds`.
    pub odds: f64,
    /// Stake debited from the user's balance at placement.
    pub amount: f64,
    pub placed_at: DateTime<Utc>,
    pub status: BetStatus,
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] user={} event={} stake={:.2} @ {:.2} ({})",
            self.id, self.user_id, self.event_id, self.amount, self.odds, self.status,
        )
    }
}

impl Bet {
    /// The amount credited to the bettor if this bet wins.
    pub fn payout(&self) -> f64 {
        self.amount * self.odds
    }
}

/// Lifecycle of a bet: `pending → won` or `pending → lost`, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

impl BetStatus {
    /// Whether the bet can still be settled.
    pub fn is_pending(&self) -> bool {
        matches!(self, BetStatus::Pending)
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Pending => write!(f, "pending"),
            BetStatus::Won => write!(f, "won"),
            BetStatus::Lost => write!(f, "lost"),
        }
    }
}

// ---------------------------------------------------------------------------
// Event result
// ---------------------------------------------------------------------------

/// Outcome applied to every pending bet of an event at settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventResult {
    Win,
    Lose,
}

impl EventResult {
    /// Terminal bet status this outcome produces.
    pub fn bet_status(&self) -> BetStatus {
        match self {
            EventResult::Win => BetStatus::Won,
            EventResult::Lose => BetStatus::Lost,
        }
    }
}

impl FromStr for EventResult {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(EventResult::Win),
            "lose" => Ok(EventResult::Lose),
            other => Err(LedgerError::InvalidInput(format!(
                "invalid result: {other} (expected \"win\" or \"lose\")"
            ))),
        }
    }
}

impl fmt::Display for EventResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventResult::Win => write!(f, "win"),
            EventResult::Lose => write!(f, "lose"),
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user account. Balance must cover the stake at placement time; it is
/// not re-validated after settlement credits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub balance: f64,
}

impl User {
    pub fn new(id: impl Into<String>, balance: f64) -> Self {
        Self { id: id.into(), balance }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain errors surfaced by the service and store. All are returned as
/// values to the caller; the HTTP layer maps them to responses.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("insufficient balance: need {needed:.2}, have {available:.2}")]
    InsufficientBalance { needed: f64, available: f64 },

    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Reserved for future backends; the in-memory store never produces it.
    #[error("storage error: {0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
