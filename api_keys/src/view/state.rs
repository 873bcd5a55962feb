//! Per-session UI state for the key list: which keys are revealed and which
//! one was copied last. Lives in the session cookie, never persisted.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const SESSION_KEY: &str = "key_view";

/// How long the "copied" confirmation stays up.
pub const COPY_INDICATOR_TTL_MS: i64 = 2000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyVisibility {
    revealed: BTreeSet<String>,
}

impl KeyVisibility {
    /// Flips the key between revealed and masked; returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.revealed.remove(id) {
            false
        } else {
            self.revealed.insert(id.to_string());
            true
        }
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    pub fn forget(&mut self, id: &str) {
        self.revealed.remove(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyState {
    Idle,
    Copied(String),
}

/// `idle -> copied(id)` on copy; back to idle once the TTL passes. A new
/// copy replaces the id and restarts the timer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyIndicator {
    copied: Option<(String, DateTime<Utc>)>,
}

impl CopyIndicator {
    pub fn copy(&mut self, id: &str, now: DateTime<Utc>) {
        self.copied = Some((id.to_string(), now));
    }

    pub fn state(&self, now: DateTime<Utc>) -> CopyState {
        match &self.copied {
            Some((id, at)) if now - *at < Duration::milliseconds(COPY_INDICATOR_TTL_MS) => {
                CopyState::Copied(id.clone())
            }
            _ => CopyState::Idle,
        }
    }

    pub fn is_copied(&self, id: &str, now: DateTime<Utc>) -> bool {
        self.state(now) == CopyState::Copied(id.to_string())
    }

    /// Drops an expired entry so it is not carried around in the cookie.
    pub fn expire(&mut self, now: DateTime<Utc>) {
        if self.state(now) == CopyState::Idle {
            self.copied = None;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyViewState {
    pub visibility: KeyVisibility,
    pub copy: CopyIndicator,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_masked_state() {
        let mut visibility = KeyVisibility::default();
        assert!(!visibility.is_revealed("k1"));

        assert!(visibility.toggle("k1"));
        assert!(visibility.is_revealed("k1"));

        assert!(!visibility.toggle("k1"));
        assert!(!visibility.is_revealed("k1"));
        assert_eq!(visibility, KeyVisibility::default());
    }

    #[test]
    fn toggles_are_per_key() {
        let mut visibility = KeyVisibility::default();
        visibility.toggle("k1");
        visibility.toggle("k2");
        visibility.toggle("k1");
        assert!(!visibility.is_revealed("k1"));
        assert!(visibility.is_revealed("k2"));
    }

    #[test]
    fn copy_indicator_expires_after_two_seconds() {
        let start = Utc::now();
        let mut copy = CopyIndicator::default();
        assert_eq!(copy.state(start), CopyState::Idle);

        copy.copy("k1", start);
        assert_eq!(copy.state(start), CopyState::Copied("k1".to_string()));
        assert!(copy.is_copied("k1", start + Duration::milliseconds(1999)));
        assert_eq!(copy.state(start + Duration::seconds(2)), CopyState::Idle);
    }

    #[test]
    fn new_copy_resets_timer_and_id() {
        let start = Utc::now();
        let mut copy = CopyIndicator::default();
        copy.copy("k1", start);
        copy.copy("k2", start + Duration::milliseconds(1500));

        let later = start + Duration::milliseconds(2500);
        assert!(!copy.is_copied("k1", later));
        assert!(copy.is_copied("k2", later));
        assert_eq!(copy.state(start + Duration::milliseconds(3500)), CopyState::Idle);
    }

    #[test]
    fn expire_clears_stale_entry_only() {
        let start = Utc::now();
        let mut copy = CopyIndicator::default();
        copy.copy("k1", start);

        copy.expire(start + Duration::milliseconds(100));
        assert!(copy.is_copied("k1", start + Duration::milliseconds(100)));

        copy.expire(start + Duration::seconds(3));
        assert_eq!(copy, CopyIndicator::default());
    }

    #[test]
    fn state_survives_session_serialization() {
        let now = Utc::now();
        let mut state = KeyViewState::default();
        state.visibility.toggle("k1");
        state.copy.copy("k1", now);

        let json = serde_json::to_string(&state).unwrap();
        let restored: KeyViewState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
