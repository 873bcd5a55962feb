use base44::models::settings::SiteSettings;
use serde::{Deserialize, Serialize};

/// Header data every visitor sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicSite {
    pub x_social_link: String,
    pub logo_url: Option<String>,
    pub ca_address: Option<String>,
}

impl PublicSite {
    pub fn from_settings(settings: Option<&SiteSettings>) -> Self {
        match settings {
            Some(s) => PublicSite {
                x_social_link: s.x_social_link_or_default().to_string(),
                logo_url: s.logo_url.clone().filter(|url| !url.is_empty()),
                ca_address: s.ca_address.clone().filter(|ca| !ca.is_empty()),
            },
            None => PublicSite {
                x_social_link: base44::models::settings::DEFAULT_X_SOCIAL_LINK.to_string(),
                logo_url: None,
                ca_address: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SaveSettingsRequest {
    #[serde(default)]
    pub ca_address: String,
    #[serde(default)]
    pub x_social_link: String,
    #[serde(default)]
    pub logo_url: String,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: Option<SiteSettings>,
}

#[derive(Debug, Serialize)]
pub struct SaveSettingsResponse {
    pub message: &'static str,
    pub settings: SiteSettings,
}

#[derive(Debug, Deserialize)]
pub struct LogoQuery {
    #[serde(default)]
    pub file_name: Option<String>,
}
