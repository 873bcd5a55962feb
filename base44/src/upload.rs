use common::error::{AppError, Res};
use log::info;
use reqwest::{
    Method,
    multipart::{Form, Part},
};

use crate::{
    client::{self, Base44Client},
    dtos::upload::{FileUpload, UploadedFile},
    store::UploadBackend,
};

impl UploadBackend for Base44Client {
    async fn upload_file(&self, token: &str, file: FileUpload) -> Res<UploadedFile> {
        let size = file.size();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| AppError::UploadRejected(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .request(
                Method::POST,
                "integration-endpoints/Core/UploadFile",
                Some(token),
            )
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadedFile = client::read_json(response).await?;
        info!(
            "Uploaded {} ({} bytes) to {}",
            file.file_name, size, uploaded.file_url
        );
        Ok(uploaded)
    }
}
