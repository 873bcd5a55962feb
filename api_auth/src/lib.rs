use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::{
    cookie::{Key, SameSite, time::Duration},
    web,
};
use base44::Base44Client;
use middleware::auth::AuthMiddleware;

pub mod middleware {
    pub mod auth;
}
pub mod routes {
    pub mod auth;
    pub mod nav;
    pub mod user;
}
pub mod services {
    pub mod auth;
    pub mod nav;
}
pub(crate) mod dtos {
    pub(crate) mod auth;
}

pub fn mount_auth() -> actix_web::Scope {
    web::scope("/auth")
        .service(routes::auth::get_login)
        .service(routes::auth::get_callback)
        .service(routes::auth::post_logout)
        .service(routes::auth::get_status)
}

pub fn mount_nav() -> actix_web::Scope {
    web::scope("/nav").service(routes::nav::get_nav)
}

pub fn mount_user() -> actix_web::Scope {
    web::scope("/me").service(routes::user::get_me)
}

// Auth middleware
pub fn auth_middleware(client: Base44Client, login_url: String) -> AuthMiddleware<Base44Client> {
    AuthMiddleware::new(client, login_url)
}

/// Where unauthenticated dashboard calls are pointed: our own login route,
/// which sets up the callback state before leaving for base44.
pub const LOGIN_PATH: &str = "/api/auth/login";

// Session cookie holding the base44 token and per-session view state
pub fn session_middleware(cookie_secure: bool, secret: &[u8]) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(secret))
        .cookie_name("blocknode_session".to_string())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::days(7)))
        .build()
}
