use std::time::Duration;

use common::{
    env_config::Config,
    error::{AppError, Res},
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// HTTP client for one base44 application.
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct Base44Client {
    pub(crate) client: Client,
    pub(crate) api_url: String,
    pub(crate) app_id: String,
    pub(crate) poll_interval: Duration,
}

impl Base44Client {
    pub fn new(api_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Base44Client {
            client: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            poll_interval: Duration::from_millis(1500),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base44_api_url.clone(), config.base44_app_id.clone())
            .with_poll_interval(Duration::from_millis(config.conversation_poll_ms))
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/api/apps/{}/{}", self.api_url, self.app_id, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, self.url(path))
            .header("X-App-Id", &self.app_id);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Turns a non-2xx response into the matching `AppError`, keeping the
/// server's own message when it sent one.
pub(crate) async fn check(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    Err(error_from_status(status, &body))
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Res<T> {
    let response = check(response).await?;
    response.json::<T>().await.map_err(AppError::from)
}

pub(crate) fn error_from_status(status: StatusCode, body: &Value) -> AppError {
    let message = ["message", "error", "detail"]
        .iter()
        .find_map(|field| body.get(field).and_then(Value::as_str))
        .map(str::to_string);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthenticated(
            message.unwrap_or_else(|| "You must be logged in to continue".to_string()),
        ),
        StatusCode::NOT_FOUND => {
            AppError::NotFound(message.unwrap_or_else(|| "Record not found".to_string()))
        }
        _ => {
            log::warn!("base44 answered {} {}", status, body);
            AppError::service(message)
        }
    }
}
