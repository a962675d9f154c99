use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::config::parse_duration_secs;
use crate::error::AppResult;
use crate::models::ResponseToken;

/// Typed descriptor of a cached backend read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    AssignmentsByMusician { planner_id: i64 },
    PlannerAssignments { planner_id: i64 },
    MonthlyContract { contract_id: i64 },
    ContractMusicians { contract_id: i64 },
    MusicianContract { token: ResponseToken },
}

/// A set of keys to drop after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPattern {
    /// Both the grouped and the raw assignment reads of a planner.
    Planner(i64),
    /// Contract detail and its per-musician list.
    Contract(i64),
    /// Every contract detail and per-musician list.
    AnyContract,
    /// Every token lookup; a date response can change any of them.
    AnyMusicianContract,
    Exact(QueryKey),
}

impl QueryPattern {
    pub fn matches(&self, key: &QueryKey) -> bool {
        match (self, key) {
            (Self::Planner(id), QueryKey::AssignmentsByMusician { planner_id })
            | (Self::Planner(id), QueryKey::PlannerAssignments { planner_id }) => id == planner_id,
            (Self::Contract(id), QueryKey::MonthlyContract { contract_id })
            | (Self::Contract(id), QueryKey::ContractMusicians { contract_id }) => id == contract_id,
            (Self::AnyContract, QueryKey::MonthlyContract { .. })
            | (Self::AnyContract, QueryKey::ContractMusicians { .. }) => true,
            (Self::AnyMusicianContract, QueryKey::MusicianContract { .. }) => true,
            (Self::Exact(exact), key) => exact == key,
            _ => false,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub assignments_ttl: Duration,
    pub contracts_ttl: Duration,
    pub responses_ttl: Duration,
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            assignments_ttl: Duration::from_secs(60),
            contracts_ttl: Duration::from_secs(120),
            responses_ttl: Duration::from_secs(30),
            max_capacity: 1000,
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            assignments_ttl: parse_duration_secs("CACHE_TTL_ASSIGNMENTS", 60),
            contracts_ttl: parse_duration_secs("CACHE_TTL_CONTRACTS", 120),
            responses_ttl: parse_duration_secs("CACHE_TTL_RESPONSES", 30),
            max_capacity: std::env::var("CACHE_MAX_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_capacity),
        }
    }

    fn ttl_for(&self, key: &QueryKey) -> Duration {
        match key {
            QueryKey::AssignmentsByMusician { .. } | QueryKey::PlannerAssignments { .. } => {
                self.assignments_ttl
            }
            QueryKey::MonthlyContract { .. } | QueryKey::ContractMusicians { .. } => {
                self.contracts_ttl
            }
            QueryKey::MusicianContract { .. } => self.responses_ttl,
        }
    }
}

struct QueryExpiry(CacheConfig);

impl Expiry<QueryKey, serde_json::Value> for QueryExpiry {
    fn expire_after_create(
        &self,
        key: &QueryKey,
        _value: &serde_json::Value,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(self.0.ttl_for(key))
    }
}

/// In-process cache of backend reads, stored as JSON.
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<QueryKey, serde_json::Value>,
    /// Bumped by every `invalidate`, before any entry is dropped.
    generation: Arc<AtomicU64>,
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(QueryExpiry(config))
            .build();
        Self {
            entries,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Get a value from cache. A stored value that no longer decodes is
    /// dropped and reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.entries.get(key).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => {
                debug!("Cache hit: {}", describe(key));
                Some(decoded)
            }
            Err(e) => {
                warn!("Cache entry {} did not decode: {e}", describe(key));
                self.entries.invalidate(key).await;
                None
            }
        }
    }

    pub async fn set<T: Serialize>(&self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.entries.insert(key, json).await,
            Err(e) => warn!("Not caching {}: {e}", describe(&key)),
        }
    }

    /// Read-through: return the cached value or fetch, store and return it.
    ///
    /// A fetch that overlaps an `invalidate` still returns its payload but
    /// leaves nothing behind in the cache.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(cached) = self.get::<T>(&key).await {
            return Ok(cached);
        }

        let started = self.generation();
        let fresh = fetch().await?;
        if self.generation() != started {
            debug!("Not caching {}: invalidated during fetch", describe(&key));
            return Ok(fresh);
        }

        self.set(key.clone(), &fresh).await;
        if self.generation() != started {
            self.entries.invalidate(&key).await;
        }
        Ok(fresh)
    }

    /// Drop every entry matching any of `patterns`.
    pub async fn invalidate(&self, patterns: &[QueryPattern]) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let doomed: Vec<Arc<QueryKey>> = self
            .entries
            .iter()
            .map(|(key, _)| key)
            .filter(|key| patterns.iter().any(|p| p.matches(key)))
            .collect();

        for key in doomed {
            debug!("Invalidating {}", describe(&key));
            self.entries.invalidate(key.as_ref()).await;
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// Log-safe rendering of a key; tokens stay out of the logs.
fn describe(key: &QueryKey) -> String {
    match key {
        QueryKey::AssignmentsByMusician { planner_id } => {
            format!("assignments-by-musician:{planner_id}")
        }
        QueryKey::PlannerAssignments { planner_id } => format!("assignments:{planner_id}"),
        QueryKey::MonthlyContract { contract_id } => format!("contract:{contract_id}"),
        QueryKey::ContractMusicians { contract_id } => format!("contract:{contract_id}:musicians"),
        QueryKey::MusicianContract { .. } => "musician-contract:<token>".to_string(),
    }
}
