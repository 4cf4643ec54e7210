use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload};
use futures::future::{Ready, ready};
use serde::{Deserialize, Serialize};

use crate::utils::jwt;

/// Authenticated caller, extracted from the Authorization header on
/// protected routes. `role` is the role name baked into the JWT at login
/// ("Guest" for users without one).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == "Administrador"
    }
}

impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let unauthorized = |message: String| {
            let response = HttpResponse::Unauthorized().json(serde_json::json!({
                "error": message
            }));
            ready(Err(actix_web::error::InternalError::from_response("", response).into()))
        };

        let Some(auth_header) = req.headers().get("Authorization") else {
            return unauthorized("Missing Authorization header".to_string());
        };

        let Ok(auth_str) = auth_header.to_str() else {
            return unauthorized("Invalid Authorization header".to_string());
        };

        let Some(token) = auth_str.strip_prefix("Bearer ") else {
            return unauthorized(
                "Invalid Authorization format (expected: Bearer <token>)".to_string(),
            );
        };

        match jwt::verify_token(token) {
            Ok(claims) => ready(Ok(AuthUser {
                user_id: claims.sub,
                email: claims.email,
                role: claims.role,
            })),
            Err(e) => unauthorized(format!("Invalid token: {}", e)),
        }
    }
}
