//! Integration tests for skip records and their TTL.

mod harness;
mod support;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use wagerbook::domain::id::MarketId;
use wagerbook::domain::interaction::SkipRecord;
use wagerbook::port::outbound::store::InteractionStore;

use support::env::TestEnv;

#[tokio::test]
async fn skips_are_listed_until_removed() {
    let db = harness::temp_db::TempDb::create("skip-basic");
    let env = TestEnv::new(db.pool());

    let alice = env.fund("alice", dec!(0)).await;
    let m1 = MarketId::new("m1");
    let m2 = MarketId::new("m2");

    env.skips.skip(&alice, &m1).await.unwrap();
    env.skips.skip(&alice, &m2).await.unwrap();

    let mut skipped = env.skips.list_skipped(&alice).await.unwrap();
    skipped.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(skipped, vec![m1.clone(), m2.clone()]);

    assert!(env.skips.remove_skip(&alice, &m1).await.unwrap());
    assert_eq!(env.skips.list_skipped(&alice).await.unwrap(), vec![m2]);

    // Removing again reports nothing existed.
    assert!(!env.skips.remove_skip(&alice, &m1).await.unwrap());
}

#[tokio::test]
async fn skip_windows_expire_after_the_ttl() {
    let db = harness::temp_db::TempDb::create("skip-ttl");
    let env = TestEnv::new(db.pool());

    let alice = env.fund("alice", dec!(0)).await;
    let market = MarketId::new("m1");
    let now = Utc::now();

    // Three-day window written directly so the clock can be advanced.
    let record = SkipRecord {
        user_id: alice.clone(),
        market_id: market.clone(),
        created_at: now,
        expires_at: now + Duration::days(3),
    };
    env.interaction_store.upsert_skip(&record).await.unwrap();

    let after_one_day = env
        .interaction_store
        .list_active(&alice, now + Duration::days(1))
        .await
        .unwrap();
    assert_eq!(after_one_day, vec![market.clone()]);

    let after_four_days = env
        .interaction_store
        .list_active(&alice, now + Duration::days(4))
        .await
        .unwrap();
    assert!(after_four_days.is_empty());
}

#[tokio::test]
async fn reskipping_restarts_the_window() {
    let db = harness::temp_db::TempDb::create("skip-refresh");
    let env = TestEnv::new(db.pool());

    let alice = env.fund("alice", dec!(0)).await;
    let market = MarketId::new("m1");
    let now = Utc::now();

    let stale = SkipRecord {
        user_id: alice.clone(),
        market_id: market.clone(),
        created_at: now - Duration::days(2),
        expires_at: now + Duration::days(1),
    };
    env.interaction_store.upsert_skip(&stale).await.unwrap();

    // The refresh pushes expiry out past the old window.
    let receipt = env.skips.skip(&alice, &market).await.unwrap();
    assert!(receipt.expires_at > now + Duration::days(2));

    let active = env
        .interaction_store
        .list_active(&alice, now + Duration::days(2))
        .await
        .unwrap();
    assert_eq!(active, vec![market]);
}

#[tokio::test]
async fn cleanup_deletes_only_expired_rows() {
    let db = harness::temp_db::TempDb::create("skip-cleanup");
    let env = TestEnv::new(db.pool());

    let alice = env.fund("alice", dec!(0)).await;
    let now = Utc::now();

    let expired = SkipRecord {
        user_id: alice.clone(),
        market_id: MarketId::new("old"),
        created_at: now - Duration::days(5),
        expires_at: now - Duration::days(2),
    };
    let live = SkipRecord {
        user_id: alice.clone(),
        market_id: MarketId::new("fresh"),
        created_at: now,
        expires_at: now + Duration::days(3),
    };
    env.interaction_store.upsert_skip(&expired).await.unwrap();
    env.interaction_store.upsert_skip(&live).await.unwrap();

    let pruned = env.interaction_store.prune_expired(now).await.unwrap();
    assert_eq!(pruned, 1);

    let remaining = env
        .interaction_store
        .list_active(&alice, now)
        .await
        .unwrap();
    assert_eq!(remaining, vec![MarketId::new("fresh")]);
}

#[tokio::test]
async fn expired_skips_drop_out_of_reads_before_cleanup_runs() {
    let db = harness::temp_db::TempDb::create("skip-stale-read");
    let env = TestEnv::new(db.pool());

    let alice = env.fund("alice", dec!(0)).await;
    let now = Utc::now();

    let expired = SkipRecord {
        user_id: alice.clone(),
        market_id: MarketId::new("old"),
        created_at: now - Duration::days(5),
        expires_at: now - Duration::hours(1),
    };
    env.interaction_store.upsert_skip(&expired).await.unwrap();

    // Visible to no reader even though the row still exists.
    assert!(env.skips.list_skipped(&alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_skip_writes_all_land_despite_ledger_traffic() {
    use wagerbook::domain::transaction::TransactionKind;

    let db = harness::temp_db::TempDb::create("skip-contention");
    let env = TestEnv::new(db.pool());

    let alice = env.fund("alice", dec!(1000)).await;

    // Skip writes race ledger writes for the database lock; the store
    // waits out the lock instead of surfacing a busy error.
    let mut tasks = Vec::new();
    for i in 0..8 {
        let skips = env.skips.clone();
        let ledger = env.ledger.clone();
        let user = alice.clone();
        tasks.push(tokio::spawn(async move {
            let market = MarketId::new(format!("m{i}"));
            skips.skip(&user, &market).await?;
            ledger
                .debit(&user, dec!(1), TransactionKind::Bet, Some(format!("b{i}")))
                .await?;
            Ok::<_, wagerbook::Error>(())
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let skipped = env.skips.list_skipped(&alice).await.unwrap();
    assert_eq!(skipped.len(), 8);
    assert_eq!(env.ledger.balance(&alice).await.unwrap().balance, dec!(992));
}
