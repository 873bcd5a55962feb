use base44::models::key::Environment;
use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};

pub const KEY_PREFIX: &str = "sk_";
/// How much of the environment name goes into the key.
pub const ENVIRONMENT_FRAGMENT_LEN: usize = 4;
pub const RANDOM_SUFFIX_LEN: usize = 13;

/// Builds a new secret: `sk_<env[..4]>_<millis base36><13 random alphanumerics>`.
///
/// Nothing checks the result against existing keys; the time component plus
/// the random suffix make a clash negligible at human creation rates.
pub fn generate_key(environment: Environment, now: DateTime<Utc>) -> String {
    let fragment: String = environment
        .as_str()
        .chars()
        .take(ENVIRONMENT_FRAGMENT_LEN)
        .collect();
    let time = to_base36(now.timestamp_millis().max(0) as u64);
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!("{}{}_{}{}", KEY_PREFIX, fragment, time, suffix)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    /// True when `key` has the shape produced by [`generate_key`].
    pub(crate) fn is_generated_key(key: &str) -> bool {
        let Some(rest) = key.strip_prefix(KEY_PREFIX) else {
            return false;
        };
        let Some((fragment, tail)) = rest.split_once('_') else {
            return false;
        };
        fragment.len() == ENVIRONMENT_FRAGMENT_LEN
            && tail.len() > RANDOM_SUFFIX_LEN
            && tail.chars().all(|c| c.is_ascii_alphanumeric())
    }

    #[test]
    fn keys_start_with_prefix_and_environment_fragment() {
        let now = Utc::now();
        let dev = generate_key(Environment::Development, now);
        let prod = generate_key(Environment::Production, now);

        assert!(dev.starts_with("sk_deve_"));
        assert!(prod.starts_with("sk_prod_"));
        for key in [&dev, &prod] {
            assert!(!key.chars().any(char::is_whitespace));
            assert!(is_generated_key(key));
        }
    }

    #[test]
    fn time_component_is_base36_millis() {
        let now = Utc.timestamp_millis_opt(1_736_936_400_000).unwrap();
        let key = generate_key(Environment::Production, now);
        let tail = key.strip_prefix("sk_prod_").unwrap();
        let time = to_base36(1_736_936_400_000);
        assert!(tail.starts_with(&time));
        assert_eq!(tail.len(), time.len() + RANDOM_SUFFIX_LEN);
    }

    #[test]
    fn consecutive_keys_differ() {
        let now = Utc::now();
        assert_ne!(
            generate_key(Environment::Development, now),
            generate_key(Environment::Development, now)
        );
    }

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn rejects_foreign_shapes() {
        assert!(!is_generated_key("pk_prod_abcdefghijklmnopq"));
        assert!(!is_generated_key("sk_production_abc"));
        assert!(!is_generated_key("sk_prod_short"));
    }
}
