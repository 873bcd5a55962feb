use common::error::{AppError, Res};
use log::{debug, warn};
use reqwest::Method;
use url::Url;

use crate::{
    client::{self, Base44Client},
    models::user::User,
    store::AuthBackend,
};

impl AuthBackend for Base44Client {
    async fn me(&self, token: &str) -> Res<User> {
        let response = self
            .request(Method::GET, "entities/User/me", Some(token))
            .send()
            .await?;
        let user: User = client::read_json(response).await?;
        if !user.has_email() {
            warn!("base44 returned a session without an email");
        }
        debug!("Session belongs to {}", user.email);
        Ok(user)
    }
}

impl Base44Client {
    /// Hosted login page that sends the browser back to `from_url` afterwards.
    pub fn login_url(&self, from_url: &str) -> Res<String> {
        let mut url = Url::parse(&format!("{}/login", self.api_url))
            .map_err(|e| AppError::Internal(format!("Invalid base44 URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("from_url", from_url)
            .append_pair("app_id", &self.app_id);
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_url_carries_return_address() {
        let client = Base44Client::new("https://base44.app", "app123");
        let url = client.login_url("http://localhost:3000/dashboard").unwrap();
        assert_eq!(
            url,
            "https://base44.app/login?from_url=http%3A%2F%2Flocalhost%3A3000%2Fdashboard&app_id=app123"
        );
    }
}
