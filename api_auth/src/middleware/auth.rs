use std::{future::Future, pin::Pin, rc::Rc, sync::Arc};

use actix_web::{
    Error, HttpMessage, HttpResponse,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use base44::store::AuthBackend;
use common::token::{self, AccessToken};
use futures::future::{Ready, ok};
use log::debug;

/// Requires a valid base44 session for every request it wraps.
///
/// On success the current `User` and its `AccessToken` are inserted into the
/// request extensions; otherwise the request is answered with 401 and the
/// login page the front end should redirect to.
pub struct AuthMiddleware<B> {
    backend: B,
    login_url: Rc<String>,
}

impl<B> AuthMiddleware<B> {
    pub fn new(backend: B, login_url: String) -> Self {
        AuthMiddleware {
            backend,
            login_url: Rc::new(login_url),
        }
    }
}

impl<S, B, Bk> Transform<S, ServiceRequest> for AuthMiddleware<Bk>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
    Bk: AuthBackend + Clone + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S, Bk>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Arc::new(service),
            backend: self.backend.clone(),
            login_url: self.login_url.clone(),
        })
    }
}

pub struct AuthMiddlewareService<S, Bk> {
    service: Arc<S>,
    backend: Bk,
    login_url: Rc<String>,
}

fn login_required(login_url: &str, message: &str) -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message,
        "login_required": true,
        "redirect": login_url,
    }))
}

impl<S, B, Bk> Service<ServiceRequest> for AuthMiddlewareService<S, Bk>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
    Bk: AuthBackend + Clone + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let access_token = token::token_from_service_request(&req);
        let backend = self.backend.clone();
        let login_url = self.login_url.clone();
        let srv = Arc::clone(&self.service);

        Box::pin(async move {
            let Some(access_token) = access_token else {
                // no token passed - 401
                let response = login_required(&login_url, "You must be logged in to continue");
                return Ok(req.into_response(response));
            };

            match backend.me(access_token.as_str()).await {
                Ok(user) => {
                    debug!("Authenticated {} for {}", user.email, req.path());
                    req.extensions_mut().insert(user);
                    req.extensions_mut().insert::<AccessToken>(access_token);
                    srv.call(req).await.map(|res| res.map_into_boxed_body())
                }
                Err(e) if e.is_unauthenticated() => {
                    let response = login_required(&login_url, &e.to_string());
                    Ok(req.into_response(response))
                }
                Err(e) => Ok(req.into_response(e.to_http_response())),
            }
        })
    }
}
