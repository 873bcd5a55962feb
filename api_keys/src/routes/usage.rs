use actix_web::{Responder, get, web};
use base44::{Base44Client, models::user::User};
use common::{error::Res, http::Success, token::AccessToken};

use crate::service::{self, cache::KeyListCache};

/// Usage analytics: call totals and the weekly average derived from the key
/// list, next to the fixed sample chart series.
#[get("")]
pub async fn get_usage(
    client: web::Data<Base44Client>,
    cache: web::Data<KeyListCache>,
    user: web::ReqData<User>,
    token: web::ReqData<AccessToken>,
) -> Res<impl Responder> {
    let keys = service::key::list_keys(client.get_ref(), &cache, &user, token.as_str()).await?;
    Success::ok(service::usage::usage_report(&keys))
}

#[cfg(test)]
mod tests {
    use actix_web::test;

    #[actix_web::test]
    async fn usage_totals_come_from_the_key_list() {
        let server = crate::routes::testing::base44().await;
        let app = crate::routes::testing::keys_app!(server);

        let req = test::TestRequest::get().uri("/usage").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_calls"], 1000);
        assert_eq!(body["avg_calls_per_day"], 143);
        assert_eq!(body["placeholder"], true);
        assert_eq!(body["daily"].as_array().unwrap().len(), 7);
        assert_eq!(body["keys"][0]["rate_limit"], 5000);
        assert_eq!(body["keys"][1]["rate_limit"], 1000);
    }
}
