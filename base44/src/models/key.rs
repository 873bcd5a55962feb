use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use serde::{Deserialize, Serialize};

/// Rate limit shown for keys that carry none.
pub const DEFAULT_RATE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl FromStr for Environment {
    type Err = AppError;

    fn from_str(s: &str) -> Res<Self> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(AppError::Validation(format!(
                "Unknown environment '{}', expected development or production",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStatus {
    Active,
    Inactive,
}

/// A normalized API key record. `key` is generated once by the dashboard and
/// never mutated; `calls_count` and `last_used` are maintained by base44.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    pub environment: Environment,
    pub key: String,
    pub status: KeyStatus,
    pub calls_count: u64,
    pub rate_limit: Option<u32>,
    pub last_used: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
}

impl ApiKey {
    pub fn is_active(&self) -> bool {
        self.status == KeyStatus::Active
    }

    pub fn effective_rate_limit(&self) -> u32 {
        self.rate_limit.unwrap_or(DEFAULT_RATE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environments_parse_from_their_wire_names() {
        assert_eq!("production".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert!(matches!(
            "staging".parse::<Environment>(),
            Err(AppError::Validation(_))
        ));
    }
}
