use std::{env, sync::Arc};

/// Largest logo upload accepted before calling the file service (5 MiB).
pub const DEFAULT_MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

/// Key lists are reused for at most this long, so backend-side counters
/// (`calls_count`, `last_used`) show up within seconds.
pub const DEFAULT_KEY_CACHE_TTL_MS: i64 = 5_000;

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// This struct holds all the necessary configuration parameters
/// required to initialize and run the dashboard backend: where the
/// external base44 service lives, the server host and port, number of
/// worker threads, CORS and session settings, logging preferences and
/// the AI agent options.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// Root URL of the base44 service.
    pub base44_api_url: String,
    /// Application id registered with base44.
    pub base44_app_id: String,
    /// Public URL of the front end, used to build login return links.
    pub app_url: String,
    /// Secret used to sign and encrypt the session cookie (at least 64 bytes).
    pub session_secret: String,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Agent the chat page talks to.
    pub agent_name: String,
    /// How often a conversation subscription polls for new messages.
    pub conversation_poll_ms: u64,
    /// Upper bound for logo uploads, in bytes.
    pub max_logo_bytes: usize,
    /// How long a fetched key list may be reused before base44 is asked again.
    pub key_cache_ttl_ms: i64,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `BASE44_APP_ID`: Application id registered with base44
    /// - `SESSION_SECRET`: Cookie signing secret, 64 bytes or more
    ///
    /// Optional (with defaults):
    /// - `ENVIRONMENT`: "development" or "production" (default: "development")
    /// - `BASE44_API_URL`: base44 root URL (default: "https://base44.app")
    /// - `APP_URL`: front end URL (default: "http://localhost:3000")
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `AGENT_NAME`: AI agent name (default: "blocknode_assistant")
    /// - `CONVERSATION_POLL_MS`: Subscription poll interval (default: 1500)
    /// - `MAX_LOGO_BYTES`: Logo upload limit (default: 5 MiB)
    /// - `KEY_CACHE_TTL_MS`: Key list reuse window (default: 5000)
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are missing
    /// or if the session secret is too short to derive a cookie key from.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        let session_secret = env::var("SESSION_SECRET").expect("SESSION_SECRET must be set");
        assert!(
            session_secret.len() >= 64,
            "SESSION_SECRET must be at least 64 bytes long"
        );

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            base44_api_url: env::var("BASE44_API_URL")
                .unwrap_or_else(|_| "https://base44.app".to_string())
                .trim_end_matches('/')
                .to_string(),
            base44_app_id: env::var("BASE44_APP_ID").expect("BASE44_APP_ID must be set"),
            app_url: env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            session_secret,
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            agent_name: env::var("AGENT_NAME")
                .unwrap_or_else(|_| "blocknode_assistant".to_string()),
            conversation_poll_ms: env::var("CONVERSATION_POLL_MS")
                .unwrap_or_else(|_| "1500".to_string())
                .parse()
                .unwrap_or(1500),
            max_logo_bytes: env::var("MAX_LOGO_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_LOGO_BYTES),
            key_cache_ttl_ms: env::var("KEY_CACHE_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl: &i64| *ttl >= 0)
                .unwrap_or(DEFAULT_KEY_CACHE_TTL_MS),
        })
    }

    /// Configuration used by unit tests across the workspace.
    pub fn for_tests() -> Self {
        Config {
            environment: "development".to_string(),
            base44_api_url: "http://base44.test".to_string(),
            base44_app_id: "app_test".to_string(),
            app_url: "http://localhost:3000".to_string(),
            session_secret: "x".repeat(64),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            num_workers: 1,
            cors_allowed_origin: "http://localhost:3000".to_string(),
            console_logging_enabled: false,
            agent_name: "blocknode_assistant".to_string(),
            conversation_poll_ms: 1500,
            max_logo_bytes: DEFAULT_MAX_LOGO_BYTES,
            key_cache_ttl_ms: DEFAULT_KEY_CACHE_TTL_MS,
        }
    }
}
