use actix_web::{Responder, get, web};
use base44::models::user::User;
use common::{error::Res, http::Success};

/// Endpoint to retrieve the current authenticated user's information.
///
/// # Output
/// - Success: `{ email, full_name, role }` of the session's account
/// - Error: 401 with a login redirect when there is no valid session
#[get("")]
pub async fn get_me(user: web::ReqData<User>) -> Res<impl Responder> {
    Success::ok(user.into_inner())
}
