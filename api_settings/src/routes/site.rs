use actix_web::{HttpRequest, Responder, get, web};
use base44::Base44Client;
use common::{error::Res, http::Success, token};

use crate::{dtos::settings::PublicSite, service};

/// Public header data: X link (defaulted), logo and contract address.
#[get("")]
pub async fn get_site(req: HttpRequest, client: web::Data<Base44Client>) -> Res<impl Responder> {
    let access_token = token::token_from_request(&req);
    let settings = service::settings::current_settings(
        client.get_ref(),
        access_token.as_ref().map(|t| t.as_str()),
    )
    .await?;
    Success::ok(PublicSite::from_settings(settings.as_ref()))
}
