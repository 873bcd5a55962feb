use actix_session::Session;
use actix_web::{Responder, delete, get, post, web};
use base44::{Base44Client, models::user::User};
use chrono::Utc;
use common::{
    error::{AppError, Res},
    http::Success,
    token::AccessToken,
};

use crate::{
    dtos::key::{CopyKeyResponse, CreateKeyRequest, KeyListResponse, VisibilityResponse},
    service::{self, cache::KeyListCache},
    view::{
        model,
        state::{COPY_INDICATOR_TTL_MS, KeyViewState, SESSION_KEY},
    },
};

pub(crate) fn load_view_state(session: &Session) -> Res<KeyViewState> {
    session
        .get::<KeyViewState>(SESSION_KEY)
        .map(Option::unwrap_or_default)
        .map_err(|_| AppError::Internal("Failed to read key view state".to_string()))
}

pub(crate) fn store_view_state(session: &Session, state: &KeyViewState) -> Res<()> {
    session
        .insert(SESSION_KEY, state)
        .map_err(|_| AppError::Internal("Failed to store key view state".to_string()))
}

/// Retrieves all API keys of the authenticated account, newest first.
///
/// Secrets are masked unless the key was revealed in this session.
///
/// # Returns
///
/// A `Result` containing the key list with its totals or an `AppError` if an error occurs.
#[get("")]
pub async fn get_keys(
    client: web::Data<Base44Client>,
    cache: web::Data<KeyListCache>,
    user: web::ReqData<User>,
    token: web::ReqData<AccessToken>,
    session: Session,
) -> Res<impl Responder> {
    let keys = service::key::list_keys(client.get_ref(), &cache, &user, token.as_str()).await?;
    let mut state = load_view_state(&session)?;
    let now = Utc::now();
    state.copy.expire(now);
    store_view_state(&session, &state)?;

    Success::ok(KeyListResponse {
        keys: model::list_items(&keys, &state, now),
        total_calls: model::total_calls(&keys),
        active_count: model::active_count(&keys),
    })
}

/// Creates a new API key for the authenticated account.
///
/// # Arguments
///
/// * `req` - Key name and environment ("development" or "production").
///
/// # Returns
///
/// The created key with its full secret, with status 201.
#[post("")]
pub async fn post_create_key(
    client: web::Data<Base44Client>,
    cache: web::Data<KeyListCache>,
    user: web::ReqData<User>,
    token: web::ReqData<AccessToken>,
    req: web::Json<CreateKeyRequest>,
) -> Res<impl Responder> {
    let key = service::key::create_key(
        client.get_ref(),
        &cache,
        &user,
        token.as_str(),
        req.into_inner(),
    )
    .await?;
    Success::created(key)
}

/// Deletes an API key. Deleting an id that no longer exists answers 404.
#[delete("/{id}")]
pub async fn delete_key(
    client: web::Data<Base44Client>,
    cache: web::Data<KeyListCache>,
    user: web::ReqData<User>,
    token: web::ReqData<AccessToken>,
    path: web::Path<String>,
    session: Session,
) -> Res<impl Responder> {
    let key_id = path.into_inner();
    service::key::delete_key(client.get_ref(), &cache, &user, token.as_str(), &key_id).await?;

    let mut state = load_view_state(&session)?;
    state.visibility.forget(&key_id);
    store_view_state(&session, &state)?;
    Success::no_content()
}

#[post("/{id}/visibility")]
pub async fn post_toggle_visibility(
    path: web::Path<String>,
    session: Session,
) -> Res<impl Responder> {
    let key_id = path.into_inner();
    let mut state = load_view_state(&session)?;
    let revealed = state.visibility.toggle(&key_id);
    store_view_state(&session, &state)?;
    Success::ok(VisibilityResponse {
        id: key_id,
        revealed,
    })
}

/// Returns the full secret for the clipboard and raises the "copied"
/// indicator for this key.
#[post("/{id}/copy")]
pub async fn post_copy_key(
    client: web::Data<Base44Client>,
    cache: web::Data<KeyListCache>,
    user: web::ReqData<User>,
    token: web::ReqData<AccessToken>,
    path: web::Path<String>,
    session: Session,
) -> Res<impl Responder> {
    let key_id = path.into_inner();
    let key =
        service::key::find_key(client.get_ref(), &cache, &user, token.as_str(), &key_id).await?;

    let mut state = load_view_state(&session)?;
    state.copy.copy(&key.id, Utc::now());
    store_view_state(&session, &state)?;

    Success::ok(CopyKeyResponse {
        id: key.id,
        key: key.key,
        copied_for_ms: COPY_INDICATOR_TTL_MS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::{App, cookie::Key, http::StatusCode, test};

    #[actix_web::test]
    async fn toggling_visibility_twice_restores_masking() {
        let app = test::init_service(
            App::new()
                .wrap(SessionMiddleware::new(
                    CookieSessionStore::default(),
                    Key::from(&[7u8; 64][..]),
                ))
                .service(web::scope("/keys").service(post_toggle_visibility)),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/keys/k1/visibility").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let cookie = res
            .response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned();
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["revealed"], true);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/keys/k1/visibility")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["id"], "k1");
        assert_eq!(body["revealed"], false);
    }

    fn session_cookie<B>(
        res: &actix_web::dev::ServiceResponse<B>,
    ) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .next()
            .expect("session cookie")
            .into_owned()
    }

    #[actix_web::test]
    async fn deleting_a_key_forgets_that_it_was_revealed() {
        let server = crate::routes::testing::base44().await;
        let app = crate::routes::testing::keys_app!(server);

        let res = test::call_service(
            &app,
            test::TestRequest::post().uri("/keys/k1/visibility").to_request(),
        )
        .await;
        let cookie = session_cookie(&res);

        let req = test::TestRequest::get().uri("/keys").cookie(cookie.clone()).to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["keys"][0]["revealed"], true);
        assert_eq!(body["keys"][0]["display_key"], "sk_prod_m5x2k3l9abcdefghijklm");

        let res = test::call_service(
            &app,
            test::TestRequest::delete().uri("/keys/k1").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let cookie = session_cookie(&res);

        // a fresh toggle reveals again instead of hiding a stale entry
        let req = test::TestRequest::post()
            .uri("/keys/k1/visibility")
            .cookie(cookie)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["revealed"], true);
    }
}
