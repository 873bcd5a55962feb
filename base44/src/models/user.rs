use serde::{Deserialize, Serialize};

/// The account behind the current session, as reported by `auth.me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }

    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }
}
