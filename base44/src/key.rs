use common::error::Res;
use log::{info, warn};
use reqwest::Method;

use crate::{
    client::{self, Base44Client},
    dtos::key::{ApiKeyRecord, NewApiKey},
    models::key::ApiKey,
    store::KeyBackend,
};

const API_KEY_ENTITY: &str = "entities/ApiKey";

impl KeyBackend for Base44Client {
    async fn list_keys(&self, token: &str, order: &str) -> Res<Vec<ApiKey>> {
        let response = self
            .request(Method::GET, API_KEY_ENTITY, Some(token))
            .query(&[("sort", order)])
            .send()
            .await?;
        let records: Vec<ApiKeyRecord> = client::read_json(response).await?;

        // a single malformed record must not hide the rest of the list
        Ok(records
            .into_iter()
            .filter_map(|record| match ApiKey::try_from(record) {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!("Skipping malformed ApiKey record: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn create_key(&self, token: &str, key: NewApiKey) -> Res<ApiKey> {
        let response = self
            .request(Method::POST, API_KEY_ENTITY, Some(token))
            .json(&key)
            .send()
            .await?;
        let record: ApiKeyRecord = client::read_json(response).await?;
        let created = ApiKey::try_from(record)?;
        info!("Created API key {} ({})", created.id, created.environment);
        Ok(created)
    }

    async fn delete_key(&self, token: &str, id: &str) -> Res<()> {
        let response = self
            .request(Method::DELETE, &format!("{}/{}", API_KEY_ENTITY, id), Some(token))
            .send()
            .await?;
        client::check(response).await?;
        info!("Deleted API key {}", id);
        Ok(())
    }
}
