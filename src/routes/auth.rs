use actix_web::{HttpResponse, ResponseError, get, post, web};
use sea_orm::DatabaseConnection;

use crate::error::ServiceError;
use crate::middleware::AuthUser;
use crate::models::dto::{AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse};
use crate::services::role_service::RoleService;
use crate::services::user_service::UserService;
use crate::utils::{jwt, password};

/// POST /api/auth/login - authenticate with email + password (PUBLIC).
/// Inactive accounts are refused so the activation email cannot be skipped.
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match UserService::find_by_email(db.get_ref(), &body.email).await {
        Ok(user) => user,
        Err(ServiceError::NotFound(_)) => {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid email or password"
            }));
        }
        Err(e) => return e.error_response(),
    };

    let valid = match password::verify_password(&body.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Password verification error: {}", e)
            }));
        }
    };
    if !valid {
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Invalid email or password"
        }));
    }

    if !user.active {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Account not activated. Check your activation email."
        }));
    }

    // Users without a role sign in as guest-level identities.
    let role = match user.role_id {
        Some(role_id) => match RoleService::find_by_id(db.get_ref(), role_id).await {
            Ok(role) => role.name,
            Err(_) => "Guest".to_string(),
        },
        None => "Guest".to_string(),
    };

    let token = match jwt::generate_token(user.id, &user.email, &role) {
        Ok(token) => token,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to generate token: {}", e)
            }));
        }
    };

    HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        email: user.email,
        role,
    })
}

/// GET /api/auth/me - inspect the current token (PROTECTED).
#[get("/me")]
pub async fn me(auth_user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(auth_user)
}

/// POST /api/auth/change-password - change own password (PROTECTED).
#[post("/change-password")]
pub async fn change_password(
    auth_user: AuthUser,
    body: web::Json<ChangePasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    UserService::change_password(
        db.get_ref(),
        auth_user.user_id,
        &body.current_password,
        &body.new_password,
    )
    .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Password changed successfully")))
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(login)
            .service(me)
            .service(change_password),
    );
}
