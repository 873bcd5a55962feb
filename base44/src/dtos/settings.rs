use serde::{Deserialize, Serialize};

/// Writable part of a SiteSettings record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettingsData {
    #[serde(default)]
    pub ca_address: String,
    #[serde(default)]
    pub x_social_link: String,
    #[serde(default)]
    pub logo_url: String,
}
