use base44::{Base44Client, models::user::User, store::AuthBackend};
use common::{
    env_config::Config,
    error::{AppError, Res},
};
use rand::{Rng, distributions::Alphanumeric};
use url::Url;

/// Session key of the one-time nonce tying a callback to the login that
/// started it.
pub const LOGIN_STATE_KEY: &str = "login_state";
const LOGIN_STATE_LEN: usize = 32;

/// Keeps return paths on our own front end: anything that is not a plain
/// absolute path falls back to `/`.
pub fn sanitize_return_path(return_to: Option<&str>) -> &str {
    match return_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => "/",
    }
}

pub fn new_login_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LOGIN_STATE_LEN)
        .map(char::from)
        .collect()
}

/// `auth.redirectToLogin(returnPath)`. The front end gets `state` back on
/// its return URL and must hand it to the callback.
pub fn login_redirect(
    client: &Base44Client,
    config: &Config,
    return_to: Option<&str>,
    state: &str,
) -> Res<String> {
    let path = sanitize_return_path(return_to);
    let mut from_url = Url::parse(&format!("{}{}", config.app_url, path))
        .map_err(|e| AppError::Internal(format!("Invalid APP_URL: {}", e)))?;
    from_url.query_pairs_mut().append_pair("state", state);
    client.login_url(from_url.as_str())
}

/// Accepts a callback only when it carries the nonce stored by the login
/// that this same session started.
pub fn verify_login_state(expected: Option<&str>, received: Option<&str>) -> Res<()> {
    match (expected, received) {
        (Some(expected), Some(received)) if !expected.is_empty() && expected == received => Ok(()),
        _ => Err(AppError::Unauthenticated(
            "Login could not be verified, please sign in again".to_string(),
        )),
    }
}

/// Current user when the token is valid, `None` for guests.
pub async fn current_user<B: AuthBackend>(backend: &B, token: Option<&str>) -> Res<Option<User>> {
    let Some(token) = token else {
        return Ok(None);
    };
    match backend.me(token).await {
        Ok(user) => Ok(Some(user)),
        Err(e) if e.is_unauthenticated() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base44::memory::MemoryBackend;

    #[test]
    fn return_paths_stay_on_site() {
        assert_eq!(sanitize_return_path(Some("/dashboard")), "/dashboard");
        assert_eq!(sanitize_return_path(Some("//evil.example")), "/");
        assert_eq!(sanitize_return_path(Some("https://evil.example")), "/");
        assert_eq!(sanitize_return_path(Some("/\\evil")), "/");
        assert_eq!(sanitize_return_path(None), "/");
    }

    #[test]
    fn login_redirect_returns_to_front_end() {
        let config = Config::for_tests();
        let client = Base44Client::from_config(&config);
        let url = login_redirect(&client, &config, Some("/apikeys"), "nonce123").unwrap();
        assert!(url.starts_with("http://base44.test/login?from_url="));
        assert!(url.contains("localhost%3A3000%2Fapikeys%3Fstate%3Dnonce123"));
        assert!(url.ends_with("app_id=app_test"));
    }

    #[test]
    fn callback_state_must_match_the_session() {
        assert!(verify_login_state(Some("abc"), Some("abc")).is_ok());
        assert!(verify_login_state(Some("abc"), Some("abd")).unwrap_err().is_unauthenticated());
        assert!(verify_login_state(None, Some("abc")).is_err());
        assert!(verify_login_state(Some("abc"), None).is_err());
        assert!(verify_login_state(Some(""), Some("")).is_err());
    }

    #[test]
    fn login_states_are_random() {
        let state = new_login_state();
        assert_eq!(state.len(), 32);
        assert_ne!(state, new_login_state());
    }

    #[tokio::test]
    async fn guests_and_stale_tokens_have_no_user() {
        let backend = MemoryBackend::new();
        assert_eq!(current_user(&backend, None).await.unwrap(), None);
        assert_eq!(current_user(&backend, Some("stale")).await.unwrap(), None);
        assert!(!backend.is_authenticated(Some("stale")).await.unwrap());
    }
}
