use serde::{Deserialize, Serialize};

/// X link shown in the header when no settings were saved yet.
pub const DEFAULT_X_SOCIAL_LINK: &str = "https://x.com";

/// Admin-editable, site-wide settings. One record per site; last write wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub id: String,
    #[serde(default)]
    pub ca_address: Option<String>,
    #[serde(default)]
    pub x_social_link: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl SiteSettings {
    pub fn x_social_link_or_default(&self) -> &str {
        self.x_social_link
            .as_deref()
            .filter(|link| !link.is_empty())
            .unwrap_or(DEFAULT_X_SOCIAL_LINK)
    }
}
