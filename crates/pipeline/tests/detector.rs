//! End-to-end behaviour of `FraudDetector` over in-memory capabilities.

mod common;

use assert_matches::assert_matches;
use common::{
    harness, transaction, MemoryCache, MemoryStore, RecordingPublisher, ScriptedAnalyzer,
};
use radar_core::{CoreError, UserProfile, UserStats};

// ---------------------------------------------------------------------------
// Test: velocity over the threshold blocks even when the engine allows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn velocity_block_overrides_engine_allow() {
    let h = harness(
        MemoryStore::default().with_user(UserProfile::new_default("u1")),
        MemoryCache::with_velocity(15),
        ScriptedAnalyzer::answering(false, "ok"),
        RecordingPublisher::default(),
    );
    let tx = transaction("tx-1", "u1", "Shop");

    h.detector.detect(&tx).await.unwrap();

    let alerts = h.publisher.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].transaction_id, "tx-1");
    assert!(alerts[0].is_blocked);
    assert_eq!(
        alerts[0].reason,
        "[Velocity Block] User exceeded transaction frequency limit"
    );
}

// ---------------------------------------------------------------------------
// Test: engine block within velocity bounds keeps the engine reason
// ---------------------------------------------------------------------------

#[tokio::test]
async fn engine_block_within_velocity_bounds() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::with_velocity(2),
        ScriptedAnalyzer::answering(true, "High risk merchant"),
        RecordingPublisher::default(),
    );

    let alert = h
        .detector
        .detect(&transaction("tx-1", "u1", "Shop"))
        .await
        .unwrap();

    assert!(alert.is_blocked);
    assert_eq!(alert.reason, "High risk merchant");
    assert_eq!(alert.ai_push_msg, "push: High risk merchant");
}

// ---------------------------------------------------------------------------
// Test: both signals block, reason carries marker and engine reason
// ---------------------------------------------------------------------------

#[tokio::test]
async fn velocity_and_engine_block_combine_reasons() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::with_velocity(11),
        ScriptedAnalyzer::answering(true, "High risk merchant"),
        RecordingPublisher::default(),
    );

    let alert = h
        .detector
        .detect(&transaction("tx-1", "u1", "Shop"))
        .await
        .unwrap();

    assert!(alert.is_blocked);
    assert_eq!(alert.reason, "[Velocity Block] High risk merchant");
}

// ---------------------------------------------------------------------------
// Test: threshold is strictly greater than ten
// ---------------------------------------------------------------------------

#[tokio::test]
async fn velocity_of_exactly_ten_is_allowed() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::with_velocity(10),
        ScriptedAnalyzer::answering(false, "Looks like a normal transaction"),
        RecordingPublisher::default(),
    );

    let alert = h
        .detector
        .detect(&transaction("tx-1", "u1", "Shop"))
        .await
        .unwrap();

    assert!(!alert.is_blocked);
    assert_eq!(alert.reason, "Looks like a normal transaction");
}

// ---------------------------------------------------------------------------
// Test: engine outage applies the fail-safe verdict
// ---------------------------------------------------------------------------

#[tokio::test]
async fn engine_outage_fails_open() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::with_velocity(1),
        ScriptedAnalyzer::unavailable(),
        RecordingPublisher::default(),
    );

    let alert = h
        .detector
        .detect(&transaction("tx-1", "u1", "Shop"))
        .await
        .unwrap();

    assert!(!alert.is_blocked);
    assert_eq!(alert.reason, "AI Service Error - FailSafe Active");
    // A fail-safe verdict is never cached.
    assert!(h.cache.verdicts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn engine_outage_with_velocity_still_blocks() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::with_velocity(20),
        ScriptedAnalyzer::unavailable(),
        RecordingPublisher::default(),
    );

    let alert = h
        .detector
        .detect(&transaction("tx-1", "u1", "Shop"))
        .await
        .unwrap();

    assert!(alert.is_blocked);
    assert!(alert.reason.starts_with("[Velocity Block]"));
}

// ---------------------------------------------------------------------------
// Test: second evaluation within the TTL reads stats from the cache
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stats_are_cached_after_first_query() {
    let h = harness(
        MemoryStore {
            stats: UserStats {
                max_amount: 1000.0,
                avg_amount: 200.0,
            },
            ..Default::default()
        },
        MemoryCache::default(),
        ScriptedAnalyzer::answering(false, "ok"),
        RecordingPublisher::default(),
    );

    h.detector
        .detect(&transaction("tx-1", "u1", "Shop"))
        .await
        .unwrap();
    h.detector
        .detect(&transaction("tx-2", "u1", "Other Shop"))
        .await
        .unwrap();

    assert_eq!(h.store.stats_queries(), 1);
    let contexts = h.analyzer.contexts.lock().unwrap().clone();
    assert_eq!(contexts.len(), 2);
    assert!(contexts
        .iter()
        .all(|c| c.contains("max_tx:1000.00,avg_tx:200.00")));
}

// ---------------------------------------------------------------------------
// Test: same (user, merchant) calls the engine once
// ---------------------------------------------------------------------------

#[tokio::test]
async fn verdict_is_reused_for_same_user_and_merchant() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::default(),
        ScriptedAnalyzer::answering(true, "High risk merchant"),
        RecordingPublisher::default(),
    );

    h.detector
        .detect(&transaction("tx-1", "u1", "Shop"))
        .await
        .unwrap();
    let second = h
        .detector
        .detect(&transaction("tx-2", "u1", "Shop"))
        .await
        .unwrap();
    h.detector
        .detect(&transaction("tx-3", "u1", "Another Shop"))
        .await
        .unwrap();

    assert_eq!(h.analyzer.calls(), 2);
    assert!(second.is_blocked);
    assert_eq!(second.transaction_id, "tx-2");
    assert_eq!(second.reason, "High risk merchant");
}

// ---------------------------------------------------------------------------
// Test: unseen user gets a default profile persisted
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unseen_user_is_created_with_default_score() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::default(),
        ScriptedAnalyzer::answering(false, "ok"),
        RecordingPublisher::default(),
    );

    h.detector
        .detect(&transaction("tx-1", "new-user", "Shop"))
        .await
        .unwrap();

    let users = h.store.users.lock().unwrap();
    let created = users.get("new-user").expect("user should be created");
    assert_eq!(created.risk_score, 15);
    assert!(!created.is_banned);
}

// ---------------------------------------------------------------------------
// Test: every evaluation is persisted and counted in the velocity window
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decision_is_persisted_and_velocity_incremented() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::default(),
        ScriptedAnalyzer::answering(false, "ok"),
        RecordingPublisher::default(),
    );
    let tx = transaction("tx-1", "u1", "Shop");

    h.detector.detect(&tx).await.unwrap();

    let events = h.store.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].transaction_id, "tx-1");
    assert_eq!(events[0].ai_reason, "ok");
    assert!(!events[0].is_blocked);
    assert_eq!(h.cache.bucket("u1", "Kyiv, Ukraine"), 1);
}

// ---------------------------------------------------------------------------
// Test: more than ten transactions in the window trip the velocity block
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rapid_transactions_trip_velocity_across_locations() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::default(),
        ScriptedAnalyzer::answering(false, "ok"),
        RecordingPublisher::default(),
    );

    for i in 0..11 {
        let mut tx = transaction(&format!("tx-{i}"), "u1", "Shop");
        tx.location = format!("City {}", i % 3);
        let alert = h.detector.detect(&tx).await.unwrap();
        assert!(!alert.is_blocked, "transaction {i} should pass");
    }

    let alert = h
        .detector
        .detect(&transaction("tx-11", "u1", "Shop"))
        .await
        .unwrap();
    assert!(alert.is_blocked);
}

// ---------------------------------------------------------------------------
// Test: infrastructure failures degrade instead of aborting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_and_cache_failures_still_publish() {
    let h = harness(
        MemoryStore {
            fail_lookup: true,
            fail_writes: true,
            ..Default::default()
        },
        MemoryCache::failing(),
        ScriptedAnalyzer::answering(false, "ok"),
        RecordingPublisher::default(),
    );

    let alert = h
        .detector
        .detect(&transaction("tx-1", "u1", "Shop"))
        .await
        .unwrap();

    assert!(!alert.is_blocked);
    assert_eq!(h.publisher.alerts().len(), 1);
    assert!(h.store.events().is_empty());
    // The engine still saw the default profile.
    let contexts = h.analyzer.contexts.lock().unwrap().clone();
    assert_eq!(contexts, vec!["risk_score:15,banned:false,max_tx:0.00,avg_tx:0.00"]);
}

// ---------------------------------------------------------------------------
// Test: publication failure is surfaced to the caller
// ---------------------------------------------------------------------------

#[tokio::test]
async fn publish_failure_is_returned() {
    let h = harness(
        MemoryStore::default(),
        MemoryCache::default(),
        ScriptedAnalyzer::answering(false, "ok"),
        RecordingPublisher::failing(),
    );

    let result = h.detector.detect(&transaction("tx-1", "u1", "Shop")).await;

    assert_matches!(result, Err(CoreError::Publish(_)));
    // Persistence happened before publication and is not rolled back.
    assert_eq!(h.store.events().len(), 1);
}
