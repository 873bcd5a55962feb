use actix_web::HttpResponse;
use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

/// Shown when the backend failed without telling us why.
pub const GENERIC_SERVICE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("Service unavailable: {0}")]
    Reqwest(#[from] reqwest::Error),

    // === APPLICATION ERRORS ===
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UploadRejected(String),

    #[error("{0}")]
    Service(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Builds a `Service` error from whatever the backend said, falling back
    /// to the generic retry message when it said nothing useful.
    pub fn service(message: Option<String>) -> Self {
        match message {
            Some(msg) if !msg.trim().is_empty() => AppError::Service(msg),
            _ => AppError::Service(GENERIC_SERVICE_MESSAGE.to_string()),
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AppError::Unauthenticated(_))
    }

    pub fn to_http_response(&self) -> HttpResponse {
        let is_dev = cfg!(debug_assertions);

        let to_internal_json = |err_msg: &str| {
            if is_dev {
                serde_json::json!({ "error": err_msg })
            } else {
                serde_json::json!({ "error": "Internal server error" })
            }
        };

        match self {
            // === CONVERSION ERRORS ===
            AppError::Reqwest(error) => {
                log::error!("Reqwest error: {}", error);
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "Service temporarily unavailable. Please try again."
                }))
            }

            // === APPLICATION ERRORS ===
            AppError::Unauthenticated(_) => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": self.to_string(),
                "login_required": true
            })),
            AppError::Forbidden(_) => {
                HttpResponse::Forbidden().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::Validation(_) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::NotFound(_) => {
                HttpResponse::NotFound().json(serde_json::json!({ "error": self.to_string() }))
            }
            AppError::UploadRejected(_) => HttpResponse::UnprocessableEntity()
                .json(serde_json::json!({ "error": self.to_string() })),
            AppError::Service(error) => {
                log::warn!("Backend error: {}", error);
                HttpResponse::BadGateway().json(serde_json::json!({ "error": self.to_string() }))
            }

            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
                HttpResponse::InternalServerError().json(to_internal_json(error))
            }
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        self.to_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};

    #[test]
    fn service_error_prefers_server_message() {
        let err = AppError::service(Some("Key limit reached".to_string()));
        assert_eq!(err.to_string(), "Key limit reached");
    }

    #[test]
    fn service_error_falls_back_to_generic_message() {
        assert_eq!(
            AppError::service(None).to_string(),
            GENERIC_SERVICE_MESSAGE
        );
        assert_eq!(
            AppError::service(Some("   ".to_string())).to_string(),
            GENERIC_SERVICE_MESSAGE
        );
    }

    #[actix_web::test]
    async fn unauthenticated_asks_for_login() {
        let res = AppError::Unauthenticated("No session".to_string()).to_http_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body = to_bytes(res.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "No session");
        assert_eq!(json["login_required"], true);
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::UploadRejected("x".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Service("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(err.to_http_response().status(), status);
        }
    }
}
