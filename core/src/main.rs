mod cors;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use api_keys::KeyListCache;
use base44::Base44Client;
use common::env_config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let origin = config.cors_allowed_origin.clone();
    let cookie_secure = !origin.contains("localhost");

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // base44 client, shared by every worker
    let client = Base44Client::from_config(&config);
    let login_url = api_auth::LOGIN_PATH.to_string();
    log::info!(
        "Using base44 app {} at {} ({})",
        config.base44_app_id,
        config.base44_api_url,
        config.environment
    );

    // key lists are cached per account across workers
    let key_cache = web::Data::new(KeyListCache::from_config(&config));

    HttpServer::new(move || {
        let secret = config_data.session_secret.as_bytes();
        App::new()
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(key_cache.clone())
            .wrap(logger::middleware()) // 3rd
            .wrap(cors::middleware(&origin)) // 2nd
            .wrap(api_auth::session_middleware(cookie_secure, secret)) // 1st
            .service(
                web::scope("/api")
                    .service(api_auth::mount_auth())
                    .service(api_auth::mount_nav())
                    .service(api_settings::mount_site())
                    .service(
                        web::scope("/dashboard")
                            .wrap(api_auth::auth_middleware(client.clone(), login_url.clone()))
                            .service(api_auth::mount_user())
                            .service(api_keys::mount_keys())
                            .service(api_keys::mount_usage())
                            .service(api_keys::mount_summary())
                            .service(api_settings::mount_settings()),
                    )
                    .service(
                        web::scope("/agent")
                            .wrap(api_auth::auth_middleware(client.clone(), login_url.clone()))
                            .service(api_agent::mount_conversations()),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
