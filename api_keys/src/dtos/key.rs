use base44::models::key::{Environment, KeyStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateKeyRequest {
    pub name: String,
    /// "development" when omitted.
    #[serde(default)]
    pub environment: Option<String>,
}

/// One row of the key list, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyListItem {
    pub id: String,
    pub name: String,
    pub environment: Environment,
    pub status: KeyStatus,
    pub display_key: String,
    pub revealed: bool,
    pub copied: bool,
    pub calls_count: u64,
    pub rate_limit: u32,
    pub last_used: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct KeyListResponse {
    pub keys: Vec<KeyListItem>,
    pub total_calls: u64,
    pub active_count: usize,
}

#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    pub id: String,
    pub revealed: bool,
}

/// Full secret handed to the clipboard.
#[derive(Debug, Serialize)]
pub struct CopyKeyResponse {
    pub id: String,
    pub key: String,
    pub copied_for_ms: i64,
}
