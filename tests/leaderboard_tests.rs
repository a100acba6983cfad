//! Integration tests for leaderboard reconciliation.

mod harness;
mod support;

use rust_decimal_macros::dec;
use wagerbook::domain::id::UserId;
use wagerbook::domain::leaderboard::SyncOutcome;

use support::env::TestEnv;

#[tokio::test]
async fn sync_writes_one_based_ranks_per_dimension() {
    let db = harness::temp_db::TempDb::create("leaderboard-sync");
    let env = TestEnv::new(db.pool());

    let alice = env.fund("alice", dec!(0)).await;
    let bob = env.fund("bob", dec!(0)).await;

    env.ranked.set_pnl(alice.clone(), dec!(120));
    env.ranked.set_pnl(bob.clone(), dec!(300));
    env.ranked.set_volume(alice.clone(), dec!(5000));

    let outcome = env.leaderboard.sync_to_db().await.unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Completed {
            updated: 2,
            missing: 0
        }
    );

    let alice_row = env.ledger.account(&alice).await.unwrap().unwrap();
    assert_eq!(alice_row.rank_by_pnl, Some(2));
    assert_eq!(alice_row.rank_by_volume, Some(1));

    let bob_row = env.ledger.account(&bob).await.unwrap().unwrap();
    assert_eq!(bob_row.rank_by_pnl, Some(1));
    // Bob never traded volume; that dimension stays unset.
    assert_eq!(bob_row.rank_by_volume, None);
}

#[tokio::test]
async fn ranks_move_when_scores_change() {
    let db = harness::temp_db::TempDb::create("leaderboard-reorder");
    let env = TestEnv::new(db.pool());

    let alice = env.fund("alice", dec!(0)).await;
    let bob = env.fund("bob", dec!(0)).await;

    env.ranked.set_pnl(alice.clone(), dec!(100));
    env.ranked.set_pnl(bob.clone(), dec!(50));
    env.leaderboard.sync_to_db().await.unwrap();
    assert_eq!(
        env.ledger.account(&alice).await.unwrap().unwrap().rank_by_pnl,
        Some(1)
    );

    env.ranked.set_pnl(bob.clone(), dec!(500));
    env.leaderboard.sync_to_db().await.unwrap();

    assert_eq!(
        env.ledger.account(&alice).await.unwrap().unwrap().rank_by_pnl,
        Some(2)
    );
    assert_eq!(
        env.ledger.account(&bob).await.unwrap().unwrap().rank_by_pnl,
        Some(1)
    );
}

#[tokio::test]
async fn entries_for_unknown_users_are_counted_and_skipped() {
    let db = harness::temp_db::TempDb::create("leaderboard-missing");
    let env = TestEnv::new(db.pool());

    let alice = env.fund("alice", dec!(0)).await;
    env.ranked.set_pnl(alice.clone(), dec!(10));
    env.ranked.set_pnl(UserId::new("stranger"), dec!(999));

    let outcome = env.leaderboard.sync_to_db().await.unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::Completed {
            updated: 1,
            missing: 1
        }
    );

    // The stranger topped the ranking, so alice is second.
    assert_eq!(
        env.ledger.account(&alice).await.unwrap().unwrap().rank_by_pnl,
        Some(2)
    );
}

#[tokio::test]
async fn empty_rankings_reconcile_to_nothing() {
    let db = harness::temp_db::TempDb::create("leaderboard-empty");
    let env = TestEnv::new(db.pool());

    env.fund("alice", dec!(0)).await;

    let outcome = env.leaderboard.sync_to_db().await.unwrap();
    assert_eq!(outcome, SyncOutcome::Empty);
}

/// Ranked store whose reads are slow enough to overlap two cycles.
struct SlowRankedStore;

#[async_trait::async_trait]
impl wagerbook::port::outbound::ranking::RankedStore for SlowRankedStore {
    async fn pnl_ranking(
        &self,
    ) -> wagerbook::error::Result<Vec<wagerbook::domain::leaderboard::RankedEntry>> {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        Ok(vec![wagerbook::domain::leaderboard::RankedEntry {
            user_id: UserId::new("alice"),
            score: dec!(10),
        }])
    }

    async fn volume_ranking(
        &self,
    ) -> wagerbook::error::Result<Vec<wagerbook::domain::leaderboard::RankedEntry>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn overlapping_sync_triggers_are_dropped_not_queued() {
    use std::sync::Arc;

    use wagerbook::service::LeaderboardSync;

    let db = harness::temp_db::TempDb::create("leaderboard-single-flight");
    let env = TestEnv::new(db.pool());

    env.fund("alice", dec!(0)).await;

    let sync = LeaderboardSync::new(Arc::new(SlowRankedStore), env.account_store.clone());

    let first = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.sync_to_db().await })
    };
    // Give the first cycle time to enter its slow ranked-store read.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let second = sync.sync_to_db().await.unwrap();
    assert_eq!(second, SyncOutcome::SkippedInFlight);

    let first = first.await.unwrap().unwrap();
    assert_eq!(
        first,
        SyncOutcome::Completed {
            updated: 1,
            missing: 0
        }
    );

    // The guard resets once the cycle finishes.
    let third = sync.sync_to_db().await.unwrap();
    assert_eq!(
        third,
        SyncOutcome::Completed {
            updated: 1,
            missing: 0
        }
    );
}
