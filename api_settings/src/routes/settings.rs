use std::sync::Arc;

use actix_web::{HttpRequest, Responder, get, http::header::CONTENT_TYPE, post, put, web};
use base44::{Base44Client, dtos::upload::FileUpload, models::user::User};
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    token::AccessToken,
};
use futures::StreamExt;

use crate::{
    dtos::settings::{LogoQuery, SaveSettingsRequest, SaveSettingsResponse, SettingsResponse},
    service::{
        self,
        settings::{SAVED_MESSAGE, require_admin},
    },
};

const DEFAULT_LOGO_NAME: &str = "logo";

/// Reads the upload body, giving up as soon as it grows past `max_bytes`.
async fn read_logo(mut payload: web::Payload, max_bytes: usize) -> Res<Vec<u8>> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|e| AppError::UploadRejected(format!("Failed to read upload: {}", e)))?;
        if body.len() + chunk.len() > max_bytes {
            return Err(service::logo::too_large(max_bytes));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.to_vec())
}

/// Current site settings for the admin form.
#[get("")]
pub async fn get_settings(
    client: web::Data<Base44Client>,
    user: web::ReqData<User>,
    token: web::ReqData<AccessToken>,
) -> Res<impl Responder> {
    require_admin(&user)?;
    let settings =
        service::settings::current_settings(client.get_ref(), Some(token.as_str())).await?;
    Success::ok(SettingsResponse { settings })
}

/// Saves the site settings.
///
/// # Input
/// - `ca_address`, `x_social_link`, `logo_url`
///
/// # Output
/// - Success: `{ message: "Saved!", settings }`
/// - Error: 403 for non-admins
#[put("")]
pub async fn put_settings(
    client: web::Data<Base44Client>,
    user: web::ReqData<User>,
    token: web::ReqData<AccessToken>,
    req: web::Json<SaveSettingsRequest>,
) -> Res<impl Responder> {
    let settings =
        service::settings::save_settings(client.get_ref(), &user, token.as_str(), req.into_inner())
            .await?;
    Success::ok(SaveSettingsResponse {
        message: SAVED_MESSAGE,
        settings,
    })
}

/// Uploads a new logo. The body is the raw file, typed by its `Content-Type`.
///
/// # Frontend Example
/// ```javascript
/// await fetch(`/api/dashboard/settings/logo?file_name=${encodeURIComponent(file.name)}`, {
///   method: 'POST',
///   headers: { 'Content-Type': file.type },
///   body: file,
///   credentials: 'include',
/// });
/// ```
#[post("/logo")]
pub async fn post_logo(
    req: HttpRequest,
    query: web::Query<LogoQuery>,
    payload: web::Payload,
    client: web::Data<Base44Client>,
    config: web::Data<Arc<Config>>,
    user: web::ReqData<User>,
    token: web::ReqData<AccessToken>,
) -> Res<impl Responder> {
    require_admin(&user)?;
    let bytes = read_logo(payload, config.max_logo_bytes).await?;
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let file = FileUpload {
        file_name: query
            .into_inner()
            .file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOGO_NAME.to_string()),
        content_type,
        bytes,
    };

    let uploaded = service::logo::upload_logo(
        client.get_ref(),
        &user,
        token.as_str(),
        file,
        config.max_logo_bytes,
    )
    .await?;
    Success::ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpMessage, dev::Service, http::StatusCode, test};

    fn user(role: &str) -> User {
        User {
            email: "someone@blocknode.app".to_string(),
            full_name: None,
            role: Some(role.to_string()),
        }
    }

    macro_rules! app {
        ($user:expr) => {{
            let config = Arc::new(Config::for_tests());
            let user = $user;
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Base44Client::from_config(&config)))
                    .app_data(web::Data::new(config.clone()))
                    .wrap_fn(move |req, srv| {
                        req.extensions_mut().insert(user.clone());
                        req.extensions_mut()
                            .insert(AccessToken("t".to_string()));
                        srv.call(req)
                    })
                    .service(crate::mount_settings()),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn oversized_logo_is_rejected_with_422() {
        let app = app!(user("admin"));
        let req = test::TestRequest::post()
            .uri("/settings/logo?file_name=big.png")
            .insert_header((CONTENT_TYPE, "image/png"))
            .set_payload(vec![0u8; 6 * 1024 * 1024])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn logo_far_over_the_limit_keeps_the_error_shape() {
        let app = app!(user("admin"));
        let req = test::TestRequest::post()
            .uri("/settings/logo?file_name=huge.png")
            .insert_header((CONTENT_TYPE, "image/png"))
            .set_payload(vec![0u8; 10 * 1024 * 1024])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "File size must be less than 5MB");
    }

    #[actix_web::test]
    async fn members_cannot_upload_logos() {
        let app = app!(user("user"));
        let req = test::TestRequest::post()
            .uri("/settings/logo")
            .insert_header((CONTENT_TYPE, "image/png"))
            .set_payload(vec![0u8; 16])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn non_image_logo_is_rejected_with_422() {
        let app = app!(user("admin"));
        let req = test::TestRequest::post()
            .uri("/settings/logo")
            .insert_header((CONTENT_TYPE, "text/plain"))
            .set_payload("hello")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn members_cannot_read_settings() {
        let app = app!(user("user"));
        let req = test::TestRequest::get().uri("/settings").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
