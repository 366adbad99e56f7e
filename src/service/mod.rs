//! Bet service — placement, settlement, and balance reads.
//!
//! All business rules live here; the store is a dumb key-value holder and
//! the API layer is a thin codec. The service operates on owned copies of
//! records and writes mutations back through the store's save operations.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::BetStore;
use crate::types::{Bet, BetStatus, EventResult, LedgerError, User, DEFAULT_STARTING_BALANCE};

pub struct BetService {
    store: Arc<dyn BetStore>,
    /// Balance granted to auto-provisioned users.
    starting_balance: f64,
}

impl BetService {
    pub fn new(store: Arc<dyn BetStore>) -> Self {
        Self::with_starting_balance(store, DEFAULT_STARTING_BALANCE)
    }

    pub fn with_starting_balance(store: Arc<dyn BetStore>, starting_balance: f64) -> Self {
        Self { store, starting_balance }
    }

    /// Place a bet for `user_id` on `event_id`, debiting the stake.
    ///
    /// Unknown users are auto-provisioned with the starting balance rather
    /// than rejected. The user save and the bet save are two independent
    /// store writes: if the second fails, the debit stands with no
    /// compensating rollback.
    pub async fn place_bet(
        &self,
        user_id: &str,
        event_id: &str,
        odds: f64,
        amount: f64,
    ) -> Result<String, LedgerError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "stake amount must be positive, got {amount}"
            )));
        }
        if !odds.is_finite() || odds <= 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "odds must be positive, got {odds}"
            )));
        }

        let mut user = self.get_or_create_user(user_id).await?;
        if user.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: user.balance,
            });
        }

        let bet = Bet {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            event_id: event_id.to_string(),
            odds,
            amount,
            placed_at: chrono::Utc::now(),
            status: BetStatus::Pending,
        };

        user.balance -= amount;
        self.store.save_user(user).await?;
        let bet_id = bet.id.clone();
        self.store.save_bet(bet).await?;

        info!(
            user = user_id,
            event = event_id,
            amount = format!("{amount:.2}"),
            odds = format!("{odds:.2}"),
            bet_id = %bet_id,
            "Bet placed"
        );
        Ok(bet_id)
    }

    /// Settle every pending bet on `event_id` to the given outcome
    /// ("win" or "lose"). Bets already in a terminal state are skipped,
    /// so re-settling an event is a per-bet no-op.
    ///
    /// A missing bettor aborts the whole call; bets settled before the
    /// abort stay settled.
    pub async fn settle_event(&self, event_id: &str, result: &str) -> Result<(), LedgerError> {
        let result: EventResult = result.parse()?;

        let bets = self.store.bets_for_event(event_id).await?;
        for mut bet in bets {
            if !bet.status.is_pending() {
                continue;
            }

            let mut user = self.store.get_user(&bet.user_id).await?;

            bet.status = result.bet_status();
            match result {
                EventResult::Win => {
                    let payout = bet.payout();
                    user.balance += payout;
                    info!(
                        user = %bet.user_id,
                        event = event_id,
                        payout = format!("{payout:.2}"),
                        "Bet won"
                    );
                }
                EventResult::Lose => {
                    info!(user = %bet.user_id, event = event_id, "Bet lost");
                }
            }

            self.store.save_user(user).await?;
            self.store.save_bet(bet).await?;
        }
        Ok(())
    }

    /// Current balance for `user_id`. Never creates a user: a user only
    /// comes into existence via a prior placement.
    pub async fn balance(&self, user_id: &str) -> Result<f64, LedgerError> {
        let user = self.store.get_user(user_id).await?;
        Ok(user.balance)
    }

    /// Auto-provisioning policy: an unknown user is synthesised with the
    /// starting balance on first placement.
    async fn get_or_create_user(&self, user_id: &str) -> Result<User, LedgerError> {
        match self.store.get_user(user_id).await {
            Ok(user) => Ok(user),
            Err(LedgerError::UserNotFound(_)) => {
                debug!(user = user_id, balance = self.starting_balance, "Auto-provisioning user");
                Ok(User::new(user_id, self.starting_balance))
            }
            Err(e) => Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    fn service() -> BetService {
        BetService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_place_bet_debits_stake() {
        let svc = service();
        let bet_id = svc.place_bet("alice", "E1", 2.0, 100.0).await.unwrap();
        assert!(!bet_id.is_empty());

        let balance = svc.balance("alice").await.unwrap();
        assert!((balance - 900.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_place_bet_rejects_nonpositive_amount() {
        let svc = service();
        for amount in [0.0, -50.0, f64::NAN] {
            let err = svc.place_bet("alice", "E1", 2.0, amount).await.unwrap_err();
            assert!(matches!(err, LedgerError::InvalidInput(_)));
        }
        // No placement went through, so alice was never provisioned.
        assert!(svc.balance("alice").await.is_err());
    }

    #[tokio::test]
    async fn test_place_bet_rejects_nonpositive_odds() {
        let svc = service();
        for odds in [0.0, -1.5, f64::INFINITY] {
            let err = svc.place_bet("alice", "E1", odds, 100.0).await.unwrap_err();
            assert!(matches!(err, LedgerError::InvalidInput(_)));
        }
        assert!(svc.balance("alice").await.is_err());
    }

    #[tokio::test]
    async fn test_new_user_starts_with_default_balance() {
        let svc = service();
        svc.place_bet("fresh", "E1", 2.0, 250.0).await.unwrap();

        let balance = svc.balance("fresh").await.unwrap();
        assert!((balance - (DEFAULT_STARTING_BALANCE - 250.0)).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_configured_starting_balance() {
        let svc = BetService::with_starting_balance(Arc::new(MemoryStore::new()), 50.0);
        svc.place_bet("small", "E1", 2.0, 10.0).await.unwrap();
        assert!((svc.balance("small").await.unwrap() - 40.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_insufficient_balance_leaves_balance_unchanged() {
        let svc = service();
        svc.place_bet("alice", "E1", 2.0, 100.0).await.unwrap(); // 900 left

        let err = svc.place_bet("alice", "E2", 2.0, 950.0).await.unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientBalance { needed, available }
                if (needed - 950.0).abs() < 1e-10 && (available - 900.0).abs() < 1e-10
        ));
        assert!((svc.balance("alice").await.unwrap() - 900.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_settle_win_credits_payout_and_is_idempotent() {
        let svc = service();
        svc.place_bet("alice", "E1", 3.0, 100.0).await.unwrap(); // 900 left

        svc.settle_event("E1", "win").await.unwrap();
        assert!((svc.balance("alice").await.unwrap() - 1200.0).abs() < 1e-10);

        // Re-settling finds no pending bets — balance untouched.
        svc.settle_event("E1", "win").await.unwrap();
        assert!((svc.balance("alice").await.unwrap() - 1200.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_settle_lose_leaves_balance_unchanged() {
        let svc = service();
        svc.place_bet("alice", "E1", 3.0, 100.0).await.unwrap(); // 900 left

        svc.settle_event("E1", "lose").await.unwrap();
        assert!((svc.balance("alice").await.unwrap() - 900.0).abs() < 1e-10);

        // Terminal either way: a later "win" must not resurrect the bet.
        svc.settle_event("E1", "win").await.unwrap();
        assert!((svc.balance("alice").await.unwrap() - 900.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_settle_invalid_result_mutates_nothing() {
        let svc = service();
        svc.place_bet("alice", "E1", 2.0, 100.0).await.unwrap();

        let err = svc.settle_event("E1", "draw").await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidInput(_)));

        // Still pending: a subsequent valid settlement pays out.
        svc.settle_event("E1", "win").await.unwrap();
        assert!((svc.balance("alice").await.unwrap() - 1100.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_settle_unknown_event_is_noop() {
        let svc = service();
        svc.settle_event("ghost-event", "win").await.unwrap();
    }

    #[tokio::test]
    async fn test_settle_only_touches_matching_event() {
        let svc = service();
        svc.place_bet("alice", "E1", 2.0, 100.0).await.unwrap(); // 900
        svc.place_bet("alice", "E2", 2.0, 100.0).await.unwrap(); // 800

        svc.settle_event("E1", "win").await.unwrap();
        // E2's bet is still pending; only E1 paid out.
        assert!((svc.balance("alice").await.unwrap() - 1000.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_balance_unknown_user() {
        let svc = service();
        let err = svc.balance("nobody").await.unwrap_err();
        assert!(matches!(err, LedgerError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_concurrent_placements_for_distinct_users() {
        let svc = Arc::new(service());

        let mut handles = Vec::new();
        for i in 0..16 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move {
                let user = format!("user-{i}");
                let stake = 10.0 * (i + 1) as f64;
                svc.place_bet(&user, "E1", 2.0, stake).await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        for i in 0..16 {
            let balance = svc.balance(&format!("user-{i}")).await.unwrap();
            let expected = DEFAULT_STARTING_BALANCE - 10.0 * (i + 1) as f64;
            assert!(
                (balance - expected).abs() < 1e-10,
                "user-{i}: got {balance}, expected {expected}"
            );
        }
    }

    #[tokio::test]
    async fn test_alice_scenario() {
        let svc = service();

        svc.place_bet("alice", "E1", 2.0, 100.0).await.unwrap();
        assert!((svc.balance("alice").await.unwrap() - 900.0).abs() < 1e-10);

        svc.settle_event("E1", "win").await.unwrap();
        assert!((svc.balance("alice").await.unwrap() - 1100.0).abs() < 1e-10);

        svc.settle_event("E1", "win").await.unwrap();
        assert!((svc.balance("alice").await.unwrap() - 1100.0).abs() < 1e-10);
    }

    // -- Failure-path tests against a mocked store --

    mockall::mock! {
        Store {}

        #[async_trait]
        impl BetStore for Store {
            async fn save_bet(&self, bet: Bet) -> Result<(), LedgerError>;
            async fn bets_for_event(&self, event_id: &str) -> Result<Vec<Bet>, LedgerError>;
            async fn save_user(&self, user: User) -> Result<(), LedgerError>;
            async fn get_user(&self, user_id: &str) -> Result<User, LedgerError>;
        }
    }

    #[tokio::test]
    async fn test_place_bet_surfaces_bet_save_failure() {
        let mut store = MockStore::new();
        store
            .expect_get_user()
            .returning(|id| Ok(User::new(id, 500.0)));
        store.expect_save_user().returning(|_| Ok(()));
        store
            .expect_save_bet()
            .returning(|_| Err(LedgerError::Storage("write failed".into())));

        let svc = BetService::new(Arc::new(store));
        let err = svc.place_bet("alice", "E1", 2.0, 100.0).await.unwrap_err();
        assert!(matches!(err, LedgerError::Storage(_)));
    }

    #[tokio::test]
    async fn test_settlement_aborts_on_missing_bettor() {
        use chrono::Utc;

        let pending = |id: &str, user: &str| Bet {
            id: id.to_string(),
            user_id: user.to_string(),
            event_id: "E1".to_string(),
            odds: 2.0,
            amount: 100.0,
            placed_at: Utc::now(),
            status: BetStatus::Pending,
        };

        let mut store = MockStore::new();
        store
            .expect_bets_for_event()
            .returning(move |_| Ok(vec![pending("b1", "ghost")]));
        store
            .expect_get_user()
            .returning(|id| Err(LedgerError::UserNotFound(id.to_string())));

        let svc = BetService::new(Arc::new(store));
        let err = svc.settle_event("E1", "win").await.unwrap_err();
        assert!(matches!(err, LedgerError::UserNotFound(ref id) if id == "ghost"));
    }
}
