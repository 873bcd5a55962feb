use base44::{
    dtos::upload::{FileUpload, UploadedFile},
    models::user::User,
    store::UploadBackend,
};
use common::error::{AppError, Res};
use log::warn;

use crate::service::settings::require_admin;

/// Checks a logo before it leaves the server: image MIME types only, at
/// most `max_bytes` long.
pub fn validate_logo(file: &FileUpload, max_bytes: usize) -> Res<()> {
    if !file.content_type.trim().to_ascii_lowercase().starts_with("image/") {
        return Err(AppError::UploadRejected(
            "Please upload an image file".to_string(),
        ));
    }
    if file.size() == 0 {
        return Err(AppError::UploadRejected("The file is empty".to_string()));
    }
    if file.size() > max_bytes {
        return Err(too_large(max_bytes));
    }
    Ok(())
}

pub fn too_large(max_bytes: usize) -> AppError {
    AppError::UploadRejected(format!(
        "File size must be less than {}MB",
        max_bytes / (1024 * 1024)
    ))
}

/// Uploads a validated logo and returns its public URL. Nothing is saved to
/// the settings record; the admin persists the URL with the next save.
pub async fn upload_logo<S: UploadBackend>(
    store: &S,
    user: &User,
    token: &str,
    file: FileUpload,
    max_bytes: usize,
) -> Res<UploadedFile> {
    require_admin(user)?;
    if let Err(e) = validate_logo(&file, max_bytes) {
        warn!(
            "Rejected logo {} ({} bytes, {}) from {}: {}",
            file.file_name,
            file.size(),
            file.content_type,
            user.email,
            e
        );
        return Err(e);
    }
    store.upload_file(token, file).await
}
