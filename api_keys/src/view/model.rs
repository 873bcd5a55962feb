//! Display-ready aggregates over a key list. Pure functions only.

use base44::models::key::ApiKey;
use chrono::{DateTime, Utc};

use crate::{dtos::key::KeyListItem, view::state::KeyViewState};

pub const MASK_CHAR: char = '•';
pub const VISIBLE_PREFIX_LEN: usize = 12;
pub const MASK_LEN: usize = 20;

pub fn total_calls(keys: &[ApiKey]) -> u64 {
    keys.iter().map(|key| key.calls_count).sum()
}

pub fn active_count(keys: &[ApiKey]) -> usize {
    keys.iter().filter(|key| key.is_active()).count()
}

/// The secret verbatim when revealed; otherwise its first 12 characters and
/// 20 mask characters, so the masked form is always 32 characters wide.
pub fn masked_key(key: &ApiKey, revealed: bool) -> String {
    if revealed {
        return key.key.clone();
    }
    let prefix: String = key.key.chars().take(VISIBLE_PREFIX_LEN).collect();
    let padding = VISIBLE_PREFIX_LEN - prefix.chars().count() + MASK_LEN;
    let mut masked = prefix;
    masked.extend(std::iter::repeat_n(MASK_CHAR, padding));
    masked
}

pub fn list_item(key: &ApiKey, state: &KeyViewState, now: DateTime<Utc>) -> KeyListItem {
    let revealed = state.visibility.is_revealed(&key.id);
    KeyListItem {
        id: key.id.clone(),
        name: key.name.clone(),
        environment: key.environment,
        status: key.status,
        display_key: masked_key(key, revealed),
        revealed,
        copied: state.copy.is_copied(&key.id, now),
        calls_count: key.calls_count,
        rate_limit: key.effective_rate_limit(),
        last_used: key.last_used,
        created_date: key.created_date,
    }
}

pub fn list_items(keys: &[ApiKey], state: &KeyViewState, now: DateTime<Utc>) -> Vec<KeyListItem> {
    keys.iter().map(|key| list_item(key, state, now)).collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use base44::models::key::{ApiKey, Environment, KeyStatus};
    use chrono::{Duration, Utc};

    pub fn key(id: &str, status: KeyStatus, calls: u64) -> ApiKey {
        ApiKey {
            id: id.to_string(),
            name: format!("Key {}", id),
            environment: Environment::Production,
            key: format!("sk_prod_m5x2k3l9{}abcdefghijklm", id),
            status,
            calls_count: calls,
            rate_limit: None,
            last_used: None,
            created_date: Utc::now() - Duration::minutes(calls as i64),
        }
    }
}
