use base44::models::user::User;
use serde::{Deserialize, Serialize};

use crate::services::nav::NavItem;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub access_token: String,
    #[serde(default)]
    pub return_to: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct NavResponse {
    pub authenticated: bool,
    pub items: Vec<NavItem>,
    pub header: Vec<NavItem>,
}
