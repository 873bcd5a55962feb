use base44::models::key::ApiKey;
use chrono::{DateTime, Utc};

use crate::{
    dtos::usage::{DailyUsage, DashboardSummary, EndpointUsage, KeyUsageRow, UsageResponse},
    view::{model, state::KeyViewState},
};

/// Usage is averaged over a fixed week, not over the keys' real lifetime.
pub const USAGE_WINDOW_DAYS: u64 = 7;
/// Share of calls shown as "AI predictions" on the dashboard.
pub const AI_PREDICTION_RATIO: f64 = 0.15;
pub const RECENT_KEYS: usize = 3;

/// Sample series, reported with `placeholder: true`.
const DAILY_USAGE: [DailyUsage; 7] = [
    DailyUsage { date: "Jan 9", calls: 850 },
    DailyUsage { date: "Jan 10", calls: 920 },
    DailyUsage { date: "Jan 11", calls: 1100 },
    DailyUsage { date: "Jan 12", calls: 780 },
    DailyUsage { date: "Jan 13", calls: 1350 },
    DailyUsage { date: "Jan 14", calls: 990 },
    DailyUsage { date: "Jan 15", calls: 1200 },
];

const ENDPOINT_USAGE: [EndpointUsage; 4] = [
    EndpointUsage { endpoint: "/v1/ticker", calls: 3450 },
    EndpointUsage { endpoint: "/v1/orderbook", calls: 2100 },
    EndpointUsage { endpoint: "/v1/trades", calls: 1800 },
    EndpointUsage { endpoint: "/v1/historical", calls: 950 },
];

pub fn avg_calls_per_day(total_calls: u64) -> u64 {
    (total_calls as f64 / USAGE_WINDOW_DAYS as f64).round() as u64
}

pub fn usage_report(keys: &[ApiKey]) -> UsageResponse {
    let total_calls = model::total_calls(keys);
    UsageResponse {
        total_calls,
        avg_calls_per_day: avg_calls_per_day(total_calls),
        placeholder: true,
        daily: DAILY_USAGE.to_vec(),
        endpoints: ENDPOINT_USAGE.to_vec(),
        keys: keys
            .iter()
            .map(|key| KeyUsageRow {
                id: key.id.clone(),
                name: key.name.clone(),
                environment: key.environment,
                calls_count: key.calls_count,
                rate_limit: key.effective_rate_limit(),
                last_used: key.last_used,
            })
            .collect(),
    }
}

pub fn dashboard_summary(
    keys: &[ApiKey],
    state: &KeyViewState,
    now: DateTime<Utc>,
) -> DashboardSummary {
    let total_calls = model::total_calls(keys);
    let recent = &keys[..keys.len().min(RECENT_KEYS)];
    DashboardSummary {
        total_keys: keys.len(),
        active_keys: model::active_count(keys),
        total_calls,
        ai_predictions: (total_calls as f64 * AI_PREDICTION_RATIO).floor() as u64,
        recent_keys: model::list_items(recent, state, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::model::fixtures::key;
    use base44::models::key::KeyStatus;

    #[test]
    fn average_rounds_over_seven_days() {
        assert_eq!(avg_calls_per_day(0), 0);
        assert_eq!(avg_calls_per_day(7), 1);
        assert_eq!(avg_calls_per_day(10), 1);
        assert_eq!(avg_calls_per_day(11), 2);
        assert_eq!(avg_calls_per_day(700), 100);
    }

    #[test]
    fn report_on_empty_list() {
        let report = usage_report(&[]);
        assert_eq!(report.total_calls, 0);
        assert_eq!(report.avg_calls_per_day, 0);
        assert!(report.placeholder);
        assert_eq!(report.daily.len(), 7);
        assert!(report.keys.is_empty());
    }

    #[test]
    fn chart_series_ignore_real_keys() {
        let keys = vec![key("a", KeyStatus::Active, 70_000)];
        let report = usage_report(&keys);
        assert_eq!(report.total_calls, 70_000);
        assert_eq!(report.avg_calls_per_day, 10_000);
        assert_eq!(report.daily, DAILY_USAGE.to_vec());
        assert_eq!(report.endpoints[0].endpoint, "/v1/ticker");
    }

    #[test]
    fn dashboard_summary_counts_and_truncates() {
        let keys = vec![
            key("a", KeyStatus::Active, 100),
            key("b", KeyStatus::Inactive, 200),
            key("c", KeyStatus::Active, 300),
            key("d", KeyStatus::Active, 33),
        ];
        let summary = dashboard_summary(&keys, &KeyViewState::default(), Utc::now());
        assert_eq!(summary.total_keys, 4);
        assert_eq!(summary.active_keys, 3);
        assert_eq!(summary.total_calls, 633);
        assert_eq!(summary.ai_predictions, 94);
        assert_eq!(summary.recent_keys.len(), 3);
        assert_eq!(summary.recent_keys[0].id, "a");
    }
}
