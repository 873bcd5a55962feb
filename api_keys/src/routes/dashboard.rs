use actix_session::Session;
use actix_web::{Responder, get, web};
use base44::{Base44Client, models::user::User};
use chrono::Utc;
use common::{error::Res, http::Success, token::AccessToken};

use crate::{
    routes::key::load_view_state,
    service::{self, cache::KeyListCache},
};

/// Quick stats for the dashboard landing page.
#[get("")]
pub async fn get_summary(
    client: web::Data<Base44Client>,
    cache: web::Data<KeyListCache>,
    user: web::ReqData<User>,
    token: web::ReqData<AccessToken>,
    session: Session,
) -> Res<impl Responder> {
    let keys = service::key::list_keys(client.get_ref(), &cache, &user, token.as_str()).await?;
    let state = load_view_state(&session)?;
    Success::ok(service::usage::dashboard_summary(&keys, &state, Utc::now()))
}
