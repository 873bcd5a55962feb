use std::sync::Arc;

use base44::models::key::ApiKey;
use chrono::{DateTime, TimeDelta, Utc};
use common::env_config::{Config, DEFAULT_KEY_CACHE_TTL_MS};
use dashmap::DashMap;

#[derive(Default)]
struct Slot {
    generation: u64,
    list: Option<(Arc<Vec<ApiKey>>, DateTime<Utc>)>,
}

/// Key lists shared by the dashboard, key management and usage views,
/// keyed by account email.
///
/// Entries live for `ttl` only: base44 moves `calls_count` and `last_used`
/// on its own and other instances may add or remove keys. Each account also
/// carries a generation, bumped by every create or delete, so a list fetched
/// before a mutation can never be stored after it.
pub struct KeyListCache {
    ttl: TimeDelta,
    slots: DashMap<String, Slot>,
}

impl Default for KeyListCache {
    fn default() -> Self {
        Self::with_ttl(TimeDelta::milliseconds(DEFAULT_KEY_CACHE_TTL_MS))
    }
}

impl KeyListCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_ttl(TimeDelta::milliseconds(config.key_cache_ttl_ms))
    }

    pub fn with_ttl(ttl: TimeDelta) -> Self {
        KeyListCache {
            ttl,
            slots: DashMap::new(),
        }
    }

    /// The cached list, if one was stored less than `ttl` ago.
    pub fn get(&self, account: &str, now: DateTime<Utc>) -> Option<Arc<Vec<ApiKey>>> {
        let slot = self.slots.get(account)?;
        let (keys, fetched_at) = slot.list.as_ref()?;
        (now - *fetched_at < self.ttl).then(|| keys.clone())
    }

    /// Generation to hand back to `put` once the fetch started now completes.
    pub fn generation(&self, account: &str) -> u64 {
        self.slots
            .get(account)
            .map(|slot| slot.generation)
            .unwrap_or_default()
    }

    /// Stores a fetched list unless the account was invalidated since
    /// `generation` was read. The list is returned either way.
    pub fn put(
        &self,
        account: &str,
        generation: u64,
        keys: Vec<ApiKey>,
        now: DateTime<Utc>,
    ) -> Arc<Vec<ApiKey>> {
        let keys = Arc::new(keys);
        let mut slot = self.slots.entry(account.to_string()).or_default();
        if slot.generation == generation {
            slot.list = Some((keys.clone(), now));
        } else {
            log::debug!("Discarded key list for {} fetched before a change", account);
        }
        keys
    }

    pub fn invalidate(&self, account: &str) {
        let mut slot = self.slots.entry(account.to_string()).or_default();
        slot.generation += 1;
        if slot.list.take().is_some() {
            log::debug!("Invalidated cached key list for {}", account);
        }
    }
}
