use base44::models::key::Environment;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::key::KeyListItem;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyUsage {
    pub date: &'static str,
    pub calls: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointUsage {
    pub endpoint: &'static str,
    pub calls: u64,
}

#[derive(Debug, Serialize)]
pub struct KeyUsageRow {
    pub id: String,
    pub name: String,
    pub environment: Environment,
    pub calls_count: u64,
    pub rate_limit: u32,
    pub last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub total_calls: u64,
    pub avg_calls_per_day: u64,
    /// The chart series below are fixed sample data, not real usage.
    pub placeholder: bool,
    pub daily: Vec<DailyUsage>,
    pub endpoints: Vec<EndpointUsage>,
    pub keys: Vec<KeyUsageRow>,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_keys: usize,
    pub active_keys: usize,
    pub total_calls: u64,
    pub ai_predictions: u64,
    pub recent_keys: Vec<KeyListItem>,
}
