use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    key::{ApiKey, Environment, KeyStatus},
    timestamp,
};

/// Payload for `entities.ApiKey.create`.
#[derive(Debug, Clone, Serialize)]
pub struct NewApiKey {
    pub name: String,
    pub environment: Environment,
    pub key: String,
    pub status: KeyStatus,
    pub calls_count: u64,
}

/// ApiKey exactly as base44 returns it: every field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeyRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub environment: Option<String>,
    pub key: Option<String>,
    pub status: Option<String>,
    pub calls_count: Option<Value>,
    pub rate_limit: Option<Value>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_date: Option<DateTime<Utc>>,
}

impl TryFrom<ApiKeyRecord> for ApiKey {
    type Error = AppError;

    fn try_from(record: ApiKeyRecord) -> Res<Self> {
        let id = record
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Service("ApiKey record without id".to_string()))?;
        let key = record
            .key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::Service(format!("ApiKey {} has no key value", id)))?;
        let environment = match record.environment.as_deref() {
            Some(env) => env
                .parse::<Environment>()
                .map_err(|_| AppError::Service(format!("ApiKey {} has environment '{}'", id, env)))?,
            None => Environment::Development,
        };
        let status = match record.status.as_deref() {
            Some("active") => KeyStatus::Active,
            _ => KeyStatus::Inactive,
        };

        Ok(ApiKey {
            name: record.name.unwrap_or_default(),
            environment,
            key,
            status,
            calls_count: count(record.calls_count.as_ref()),
            rate_limit: count_opt(record.rate_limit.as_ref())
                .and_then(|limit| u32::try_from(limit).ok())
                .filter(|limit| *limit > 0),
            last_used: record.last_used,
            created_date: record.created_date.unwrap_or_else(Utc::now),
            id,
        })
    }
}

/// Counters arrive as numbers, numeric strings or floats depending on who wrote them.
fn count_opt(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn count(value: Option<&Value>) -> u64 {
    count_opt(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ApiKeyRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn fills_defaults_for_missing_counters() {
        let key = ApiKey::try_from(record(json!({
            "id": "k1",
            "name": "Prod Key",
            "environment": "production",
            "key": "sk_prod_abc",
            "status": "active",
            "calls_count": null,
            "created_date": "2025-01-15T10:30:00.000000"
        })))
        .unwrap();

        assert_eq!(key.calls_count, 0);
        assert_eq!(key.rate_limit, None);
        assert_eq!(key.effective_rate_limit(), 1000);
        assert!(key.last_used.is_none());
        assert!(key.is_active());
    }

    #[test]
    fn accepts_loosely_typed_numbers() {
        let key = ApiKey::try_from(record(json!({
            "id": "k1",
            "key": "sk_deve_abc",
            "calls_count": "42",
            "rate_limit": 250.0,
            "status": "inactive"
        })))
        .unwrap();

        assert_eq!(key.calls_count, 42);
        assert_eq!(key.rate_limit, Some(250));
        assert_eq!(key.environment, Environment::Development);
        assert!(!key.is_active());
    }

    #[test]
    fn zero_rate_limit_means_default() {
        let key = ApiKey::try_from(record(json!({
            "id": "k1", "key": "sk_x", "rate_limit": 0
        })))
        .unwrap();
        assert_eq!(key.effective_rate_limit(), 1000);
    }

    #[test]
    fn rejects_records_without_id_or_key() {
        assert!(ApiKey::try_from(record(json!({ "key": "sk_x" }))).is_err());
        assert!(ApiKey::try_from(record(json!({ "id": "k1" }))).is_err());
    }
}
