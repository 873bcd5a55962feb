use std::sync::Arc;

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, http::header::LOCATION, post, web};
use base44::Base44Client;
use common::{
    env_config::Config,
    error::{AppError, Res},
    http::Success,
    token::{self, SESSION_TOKEN_KEY},
};
use log::info;

use crate::{
    dtos::auth::{AuthStatus, CallbackQuery, LoginQuery},
    services::{self, auth::LOGIN_STATE_KEY},
};

/// Sends the browser to the hosted base44 login page.
///
/// # Input
/// - `return_to`: Front-end path to come back to after login (default `/`)
///
/// # Output
/// - 302 redirect to the login page, with a fresh login state kept in the
///   session and appended to the return URL
///
/// # Frontend Example
/// ```javascript
/// window.location.href = `/api/auth/login?return_to=${encodeURIComponent(location.pathname)}`;
/// ```
#[get("/login")]
pub async fn get_login(
    query: web::Query<LoginQuery>,
    client: web::Data<Base44Client>,
    config: web::Data<Arc<Config>>,
    session: Session,
) -> Res<impl Responder> {
    let state = services::auth::new_login_state();
    session
        .insert(LOGIN_STATE_KEY, &state)
        .map_err(|_| AppError::Internal("Failed to insert login state".to_string()))?;
    let url = services::auth::login_redirect(&client, &config, query.return_to.as_deref(), &state)?;
    Ok(HttpResponse::Found()
        .append_header((LOCATION, url))
        .finish())
}

/// Landing point after a successful base44 login.
///
/// Stores the access token in the session cookie and redirects back to the
/// front end, so later dashboard calls work without an Authorization header.
/// The `state` must match the one `/login` put in this session.
#[get("/callback")]
pub async fn get_callback(
    query: web::Query<CallbackQuery>,
    config: web::Data<Arc<Config>>,
    session: Session,
) -> Res<impl Responder> {
    let query = query.into_inner();
    let expected = session.remove_as::<String>(LOGIN_STATE_KEY).and_then(Result::ok);
    services::auth::verify_login_state(expected.as_deref(), query.state.as_deref())?;
    if query.access_token.trim().is_empty() {
        return Err(AppError::Unauthenticated(
            "Login did not return an access token".to_string(),
        ));
    }
    session
        .insert(SESSION_TOKEN_KEY, query.access_token.trim())
        .map_err(|_| AppError::Internal("Failed to insert token cookie".to_string()))?;
    session.renew();

    let path = services::auth::sanitize_return_path(query.return_to.as_deref());
    Ok(HttpResponse::Found()
        .append_header((LOCATION, format!("{}{}", config.app_url, path)))
        .finish())
}

/// `auth.logout()`: forgets the token and every bit of per-session view state.
#[post("/logout")]
pub async fn post_logout(session: Session) -> Res<impl Responder> {
    session.purge();
    info!("Session logged out");
    Success::ok(serde_json::json!({ "logged_out": true }))
}

/// `auth.isAuthenticated()` plus the user when there is one. Never 401s.
#[get("/status")]
pub async fn get_status(req: HttpRequest, client: web::Data<Base44Client>) -> Res<impl Responder> {
    let access_token = token::token_from_request(&req);
    let user = services::auth::current_user(
        client.get_ref(),
        access_token.as_ref().map(|t| t.as_str()),
    )
    .await?;
    Success::ok(AuthStatus {
        authenticated: user.is_some(),
        user,
    })
}
