//! In-memory capability doubles for detector tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use radar_core::capabilities::{
    AlertPublisher, RiskAnalyzer, RiskVerdictCache, StatsCache, UserStore, VelocityTracker,
};
use radar_core::{
    CoreError, FraudAlert, FraudEvent, RiskVerdict, Transaction, UserProfile, UserStats,
};
use radar_pipeline::FraudDetector;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<HashMap<String, UserProfile>>,
    pub events: Mutex<Vec<FraudEvent>>,
    pub stats: UserStats,
    pub stats_queries: AtomicUsize,
    pub fail_lookup: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn with_user(self, profile: UserProfile) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
        self
    }

    pub fn stats_queries(&self) -> usize {
        self.stats_queries.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<FraudEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user_by_id(&self, id: &str) -> Result<Option<UserProfile>, CoreError> {
        if self.fail_lookup {
            return Err(CoreError::store("lookup failed"));
        }
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn create_user(&self, user: &UserProfile) -> Result<(), CoreError> {
        if self.fail_writes {
            return Err(CoreError::store("insert failed"));
        }
        self.users
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn save_fraud_event(&self, event: &FraudEvent) -> Result<(), CoreError> {
        if self.fail_writes {
            return Err(CoreError::store("insert failed"));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn get_user_stats(&self, _user_id: &str) -> Result<UserStats, CoreError> {
        self.stats_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.stats)
    }
}

// ---------------------------------------------------------------------------
// Caches
// ---------------------------------------------------------------------------

/// Stats, velocity and verdict caches without expiry.
///
/// `fixed_velocity` overrides the counted velocity when set.
#[derive(Default)]
pub struct MemoryCache {
    pub stats: Mutex<HashMap<String, UserStats>>,
    pub verdicts: Mutex<HashMap<(String, String), RiskVerdict>>,
    pub buckets: Mutex<HashMap<(String, String), u64>>,
    pub fixed_velocity: Option<u64>,
    pub fail_all: bool,
}

impl MemoryCache {
    pub fn with_velocity(velocity: u64) -> Self {
        Self {
            fixed_velocity: Some(velocity),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Default::default()
        }
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.fail_all {
            Err(CoreError::cache("cache down"))
        } else {
            Ok(())
        }
    }

    pub fn bucket(&self, user_id: &str, location: &str) -> u64 {
        self.buckets
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), location.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl StatsCache for MemoryCache {
    async fn get_user_stats(&self, user_id: &str) -> Result<Option<UserStats>, CoreError> {
        self.check()?;
        Ok(self.stats.lock().unwrap().get(user_id).copied())
    }

    async fn set_user_stats(&self, user_id: &str, stats: UserStats) -> Result<(), CoreError> {
        self.check()?;
        self.stats.lock().unwrap().insert(user_id.to_string(), stats);
        Ok(())
    }
}

#[async_trait]
impl VelocityTracker for MemoryCache {
    async fn get_velocity(&self, user_id: &str) -> Result<u64, CoreError> {
        self.check()?;
        if let Some(velocity) = self.fixed_velocity {
            return Ok(velocity);
        }
        Ok(self
            .buckets
            .lock()
            .unwrap()
            .iter()
            .filter(|((user, _), _)| user == user_id)
            .map(|(_, count)| *count)
            .sum())
    }

    async fn increment_velocity(&self, user_id: &str, location: &str) -> Result<(), CoreError> {
        self.check()?;
        *self
            .buckets
            .lock()
            .unwrap()
            .entry((user_id.to_string(), location.to_string()))
            .or_insert(0) += 1;
        Ok(())
    }
}

#[async_trait]
impl RiskVerdictCache for MemoryCache {
    async fn get_risk_verdict(
        &self,
        user_id: &str,
        merchant: &str,
    ) -> Result<Option<RiskVerdict>, CoreError> {
        self.check()?;
        Ok(self
            .verdicts
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), merchant.to_string()))
            .cloned())
    }

    async fn set_risk_verdict(
        &self,
        user_id: &str,
        merchant: &str,
        verdict: &RiskVerdict,
    ) -> Result<(), CoreError> {
        self.check()?;
        self.verdicts
            .lock()
            .unwrap()
            .insert((user_id.to_string(), merchant.to_string()), verdict.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Risk engine
// ---------------------------------------------------------------------------

/// Returns a fixed verdict, or fails when `verdict` is `None`.
pub struct ScriptedAnalyzer {
    pub verdict: Option<RiskVerdict>,
    pub calls: AtomicUsize,
    pub contexts: Mutex<Vec<String>>,
}

impl ScriptedAnalyzer {
    pub fn answering(is_blocked: bool, reason: &str) -> Self {
        Self {
            verdict: Some(RiskVerdict {
                reason: reason.to_string(),
                ai_push_msg: format!("push: {reason}"),
                is_blocked,
            }),
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            verdict: None,
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RiskAnalyzer for ScriptedAnalyzer {
    async fn analyze(
        &self,
        _tx: &Transaction,
        profile: &UserProfile,
    ) -> Result<RiskVerdict, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contexts
            .lock()
            .unwrap()
            .push(profile.context_summary());
        self.verdict
            .clone()
            .ok_or_else(|| CoreError::risk_service("engine down"))
    }
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingPublisher {
    pub alerts: Mutex<Vec<FraudAlert>>,
    pub fail: bool,
}

impl RecordingPublisher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn alerts(&self) -> Vec<FraudAlert> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertPublisher for RecordingPublisher {
    async fn publish(&self, alert: &FraudAlert) -> Result<(), CoreError> {
        if self.fail {
            return Err(CoreError::publish("broker unavailable"));
        }
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub analyzer: Arc<ScriptedAnalyzer>,
    pub publisher: Arc<RecordingPublisher>,
    pub detector: FraudDetector,
}

pub fn harness(
    store: MemoryStore,
    cache: MemoryCache,
    analyzer: ScriptedAnalyzer,
    publisher: RecordingPublisher,
) -> Harness {
    let store = Arc::new(store);
    let cache = Arc::new(cache);
    let analyzer = Arc::new(analyzer);
    let publisher = Arc::new(publisher);

    let detector = FraudDetector::new(
        store.clone(),
        cache.clone(),
        cache.clone(),
        cache.clone(),
        analyzer.clone(),
        publisher.clone(),
    );

    Harness {
        store,
        cache,
        analyzer,
        publisher,
        detector,
    }
}

pub fn transaction(id: &str, user_id: &str, merchant: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        user_id: user_id.to_string(),
        amount: 150.0,
        currency: "USD".into(),
        merchant: merchant.to_string(),
        location: "Kyiv, Ukraine".into(),
        ip: "192.168.1.7".into(),
        timestamp: chrono::Utc::now(),
    }
}
