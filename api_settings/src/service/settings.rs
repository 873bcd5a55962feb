use base44::{
    dtos::settings::SiteSettingsData,
    models::{settings::SiteSettings, user::User},
    store::SettingsBackend,
};
use common::error::{AppError, Res};
use log::info;

use crate::dtos::settings::SaveSettingsRequest;

/// Confirmation shown after a successful save.
pub const SAVED_MESSAGE: &str = "Saved!";

pub fn require_admin(user: &User) -> Res<()> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only administrators can change site settings".to_string(),
        ))
    }
}

/// The site's settings record, if one was ever saved.
pub async fn current_settings<S: SettingsBackend>(
    store: &S,
    token: Option<&str>,
) -> Res<Option<SiteSettings>> {
    let settings = store.list_settings(token).await?;
    Ok(settings.into_iter().next())
}

/// Writes the singleton: updates the existing record, or creates the first
/// one. Concurrent admins simply overwrite each other.
pub async fn save_settings<S: SettingsBackend>(
    store: &S,
    user: &User,
    token: &str,
    req: SaveSettingsRequest,
) -> Res<SiteSettings> {
    require_admin(user)?;
    let data = SiteSettingsData {
        ca_address: req.ca_address.trim().to_string(),
        x_social_link: req.x_social_link.trim().to_string(),
        logo_url: req.logo_url.trim().to_string(),
    };

    let saved = match current_settings(store, Some(token)).await? {
        Some(existing) => store.update_settings(token, &existing.id, data).await?,
        None => store.create_settings(token, data).await?,
    };
    info!("Site settings {} saved by {}", saved.id, user.email);
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base44::memory::MemoryBackend;

    fn user(role: &str) -> User {
        User {
            email: format!("{}@blocknode.app", role),
            full_name: None,
            role: Some(role.to_string()),
        }
    }

    fn request(ca: &str) -> SaveSettingsRequest {
        SaveSettingsRequest {
            ca_address: ca.to_string(),
            x_social_link: "https://x.com/blocknode".to_string(),
            logo_url: String::new(),
        }
    }

    #[tokio::test]
    async fn first_save_creates_then_updates_in_place() {
        let admin = user("admin");
        let backend = MemoryBackend::new().with_session("t", admin.clone());

        let created = save_settings(&backend, &admin, "t", request(" 0xabc ")).await.unwrap();
        assert_eq!(created.ca_address.as_deref(), Some("0xabc"));

        let updated = save_settings(&backend, &admin, "t", request("0xdef")).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(backend.settings().len(), 1);
        assert_eq!(backend.settings()[0].ca_address.as_deref(), Some("0xdef"));
    }

    #[tokio::test]
    async fn non_admins_cannot_save() {
        let member = user("user");
        let backend = MemoryBackend::new().with_session("t", member.clone());

        let err = save_settings(&backend, &member, "t", request("0xabc")).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(backend.settings().is_empty());
    }

    #[tokio::test]
    async fn no_record_means_no_settings() {
        let backend = MemoryBackend::new();
        assert_eq!(current_settings(&backend, None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn offline_backend_surfaces_service_error() {
        let admin = user("admin");
        let backend = MemoryBackend::new().with_session("t", admin.clone());
        backend.set_offline(true);

        let err = save_settings(&backend, &admin, "t", request("0xabc")).await.unwrap_err();
        assert!(matches!(err, AppError::Service(_)));
    }
}
