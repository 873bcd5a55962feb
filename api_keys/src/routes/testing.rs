//! Shared harness for route tests: a base44 stand-in over HTTP and an app
//! with a signed-in user and a cookie session.

use base44::models::user::User;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

pub(crate) const APP_ID: &str = "app_test";
pub(crate) const TOKEN: &str = "session-token";

pub(crate) fn user() -> User {
    User {
        email: "dev@blocknode.app".to_string(),
        full_name: Some("Dev".to_string()),
        role: Some("user".to_string()),
    }
}

pub(crate) fn records() -> Value {
    json!([
        {
            "id": "k1",
            "name": "Prod Key",
            "environment": "production",
            "key": "sk_prod_m5x2k3l9abcdefghijklm",
            "status": "active",
            "calls_count": 700,
            "rate_limit": 5000,
            "created_date": "2025-01-15T10:00:00Z"
        },
        {
            "id": "k2",
            "name": "Dev Key",
            "environment": "development",
            "key": "sk_deve_m5x2k3l9nopqrstuvwxyz",
            "status": "inactive",
            "calls_count": "300",
            "created_date": "2025-01-14T10:00:00Z"
        }
    ])
}

/// base44 answering the key list with [`records`] and accepting deletes.
pub(crate) async fn base44() -> MockServer {
    let server = MockServer::start().await;
    let entity = format!("/api/apps/{}/entities/ApiKey", APP_ID);

    Mock::given(method("GET"))
        .and(path(entity.as_str()))
        .and(query_param("sort", "-created_date"))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(records()))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/k1", entity).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    server
}

/// App with the key scopes, the caller already authenticated.
macro_rules! keys_app {
    ($server:expr) => {{
        use actix_session::{SessionMiddleware, storage::CookieSessionStore};
        use actix_web::{App, HttpMessage, cookie::Key, dev::Service, test, web};

        let client = base44::Base44Client::new($server.uri(), crate::routes::testing::APP_ID);
        test::init_service(
            App::new()
                .app_data(web::Data::new(client))
                .app_data(web::Data::new(crate::KeyListCache::new()))
                .wrap_fn(|req, srv| {
                    req.extensions_mut().insert(crate::routes::testing::user());
                    req.extensions_mut().insert(common::token::AccessToken(
                        crate::routes::testing::TOKEN.to_string(),
                    ));
                    srv.call(req)
                })
                .wrap(SessionMiddleware::new(
                    CookieSessionStore::default(),
                    Key::from(&[7u8; 64][..]),
                ))
                .service(crate::mount_keys())
                .service(crate::mount_usage())
                .service(crate::mount_summary()),
        )
        .await
    }};
}

pub(crate) use keys_app;
