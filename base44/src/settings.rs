use common::error::Res;
use reqwest::Method;

use crate::{
    client::{self, Base44Client},
    dtos::settings::SiteSettingsData,
    models::settings::SiteSettings,
    store::SettingsBackend,
};

const SITE_SETTINGS_ENTITY: &str = "entities/SiteSettings";

impl SettingsBackend for Base44Client {
    async fn list_settings(&self, token: Option<&str>) -> Res<Vec<SiteSettings>> {
        let response = self
            .request(Method::GET, SITE_SETTINGS_ENTITY, token)
            .send()
            .await?;
        client::read_json(response).await
    }

    async fn create_settings(&self, token: &str, data: SiteSettingsData) -> Res<SiteSettings> {
        let response = self
            .request(Method::POST, SITE_SETTINGS_ENTITY, Some(token))
            .json(&data)
            .send()
            .await?;
        client::read_json(response).await
    }

    async fn update_settings(
        &self,
        token: &str,
        id: &str,
        data: SiteSettingsData,
    ) -> Res<SiteSettings> {
        let response = self
            .request(
                Method::PUT,
                &format!("{}/{}", SITE_SETTINGS_ENTITY, id),
                Some(token),
            )
            .json(&data)
            .send()
            .await?;
        client::read_json(response).await
    }
}
