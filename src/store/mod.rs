//! Storage layer.
//!
//! `BetStore` is the narrow capability contract the service depends on;
//! `MemoryStore` is the in-memory implementation backing it. Records cross
//! this boundary by value: callers receive owned copies and persist
//! mutations by saving the whole record back.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::types::{Bet, LedgerError, User};

/// Capability set required by the bet service. Implementations must be
/// safe to share across request tasks.
#[async_trait]
pub trait BetStore: Send + Sync {
    /// Insert or overwrite a bet, keyed by its id.
    async fn save_bet(&self, bet: Bet) -> Result<(), LedgerError>;

    /// All bets for an event, unordered. Empty when the event is unknown.
    async fn bets_for_event(&self, event_id: &str) -> Result<Vec<Bet>, LedgerError>;

    /// Insert or overwrite a user, keyed by their id.
    async fn save_user(&self, user: User) -> Result<(), LedgerError>;

    /// Look up a user. Fails with `UserNotFound` only.
    async fn get_user(&self, user_id: &str) -> Result<User, LedgerError>;
}

/// Both maps sit behind one lock so a reader never observes a
/// partially-written record. There is no cross-record atomicity: two
/// saves are two independent critical sections.
#[derive(Default)]
struct Tables {
    bets: HashMap<String, Bet>,
    users: HashMap<String, User>,
}

/// In-memory store. No persistence: state lives and dies with the process.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BetStore for MemoryStore {
    async fn save_bet(&self, bet: Bet) -> Result<(), LedgerError> {
        let mut tables = self.tables.write().await;
        tables.bets.insert(bet.id.clone(), bet);
        Ok(())
    }

    // Full scan over all bets. No secondary index by event — fine at this
    // scale, a known limitation beyond it.
    async fn bets_for_event(&self, event_id: &str) -> Result<Vec<Bet>, LedgerError> {
        let tables = self.tables.read().await;
        Ok(tables
            .bets
            .values()
            .filter(|b| b.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn save_user(&self, user: User) -> Result<(), LedgerError> {
        let mut tables = self.tables.write().await;
        tables.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, LedgerError> {
        let tables = self.tables.read().await;
        tables
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
