use actix_web::{HttpRequest, Responder, get, web};
use base44::{Base44Client, store::AuthBackend};
use common::{error::Res, http::Success, token};
use log::warn;

use crate::{dtos::auth::NavResponse, services::nav};

/// Navigation for the current visitor. A backend failure while checking the
/// session degrades to the guest menu instead of failing the page.
#[get("")]
pub async fn get_nav(req: HttpRequest, client: web::Data<Base44Client>) -> Res<impl Responder> {
    let access_token = token::token_from_request(&req);
    let authenticated = client
        .is_authenticated(access_token.as_ref().map(|t| t.as_str()))
        .await
        .unwrap_or_else(|e| {
            warn!("Session check failed, showing guest navigation: {}", e);
            false
        });

    Success::ok(NavResponse {
        authenticated,
        items: nav::visible_items(authenticated),
        header: nav::header_items(),
    })
}
