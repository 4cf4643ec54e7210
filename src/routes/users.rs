use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::error::ServiceError;
use crate::middleware::AuthUser;
use crate::models::dto::{
    MessageResponse, RegisterResponse, RegisterUserRequest, UpdateUserRequest, UserResponse,
};
use crate::services::mail_service::MailService;
use crate::services::user_service::UserService;
use crate::services::vehicle_service::VehicleService;
use crate::services::verification_service::{RedeemOutcome, VerificationService};

/// GET /api/users/list/{ordered} - list users, ordered by name when true.
#[get("/list/{ordered}")]
pub async fn list(
    _auth_user: AuthUser,
    path: web::Path<bool>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let users = UserService::list(db.get_ref(), path.into_inner()).await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/email/{email} - look a user up by email.
#[get("/email/{email}")]
pub async fn find_by_email(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let user = UserService::find_by_email(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// GET /api/users/cpf/{cpf} - look a user up by CPF (formatted or not).
#[get("/cpf/{cpf}")]
pub async fn find_by_cpf(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let user = UserService::find_by_cpf(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// GET /api/users/{id} - look a user up by id.
#[get("/{id}")]
pub async fn find_by_id(
    _auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let user = UserService::find_by_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// GET /api/users/{id}/vehicles - vehicles owned by a user.
#[get("/{id}/vehicles")]
pub async fn owned_vehicles(
    _auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();
    UserService::find_by_id(db.get_ref(), id).await?;
    let vehicles = VehicleService::owned_by(db.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(vehicles))
}

/// POST /api/users - register a new account (PUBLIC).
///
/// The user row and their activation token are persisted first; the
/// activation email is attempted afterwards, and a delivery failure is
/// reported in the response instead of rolling the registration back.
#[post("")]
pub async fn register(
    body: web::Json<RegisterUserRequest>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<MailService>,
) -> Result<HttpResponse, ServiceError> {
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;

    let (user, token) = UserService::register(
        db.get_ref(),
        body.into_inner(),
        Uuid::new_v4(),
        Utc::now().naive_utc(),
    )
    .await?;

    let (notification_sent, message) = match mailer
        .send_activation_email(&user.email, &user.name, &token)
        .await
    {
        Ok(()) => (true, "User registered; activation email sent".to_string()),
        Err(e) => {
            log::warn!("Registration saved but the activation email failed: {}", e);
            (
                false,
                "User registered, but the activation email could not be delivered".to_string(),
            )
        }
    };

    Ok(HttpResponse::Created().json(RegisterResponse {
        user: UserResponse::from(user),
        notification_sent,
        message,
    }))
}

/// PUT /api/users - update a user (optimistic-locked by `version`).
#[put("")]
pub async fn update(
    _auth_user: AuthUser,
    body: web::Json<UpdateUserRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
    let user = UserService::update(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// PUT /api/users/activate/{id} - administratively activate an account.
#[put("/activate/{id}")]
pub async fn activate(
    auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    if !auth_user.is_admin() {
        return Ok(forbidden());
    }
    let user = UserService::set_active(db.get_ref(), path.into_inner(), true).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "User {} ACTIVATED in the system",
        user.name
    ))))
}

/// PUT /api/users/deactivate/{id} - administratively deactivate an account.
#[put("/deactivate/{id}")]
pub async fn deactivate(
    auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    if !auth_user.is_admin() {
        return Ok(forbidden());
    }
    let user = UserService::set_active(db.get_ref(), path.into_inner(), false).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "User {} DEACTIVATED in the system",
        user.name
    ))))
}

/// POST /api/users/resend-activation/{id} - issue or renew the activation
/// token for an account and email the link again (PUBLIC, mirrors the
/// original account-activation flow).
#[post("/resend-activation/{id}")]
pub async fn resend_activation(
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
    mailer: web::Data<MailService>,
) -> Result<HttpResponse, ServiceError> {
    let user = UserService::find_by_id(db.get_ref(), path.into_inner()).await?;
    if user.active {
        return Ok(HttpResponse::Ok()
            .json(MessageResponse::new("Account is already active, nothing to do")));
    }

    let token = VerificationService::issue_or_renew(
        db.get_ref(),
        user.id,
        Uuid::new_v4(),
        Utc::now().naive_utc(),
    )
    .await?;

    mailer.send_activation_email(&user.email, &user.name, &token).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Activation email sent")))
}

/// DELETE /api/users/{id} - hard-delete a user; their verification token is
/// unlinked and their vehicles removed in the same transaction.
#[delete("/{id}")]
pub async fn remove(
    auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    if !auth_user.is_admin() {
        return Ok(forbidden());
    }
    UserService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User DELETED from the system")))
}

/// GET /usuario/uuid/{token} - the public activation endpoint reached from
/// the emailed link. Registered outside the /api scope so the link format
/// never changes.
#[get("/usuario/uuid/{token}")]
pub async fn activate_by_token(
    path: web::Path<Uuid>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let token = path.into_inner();
    log::info!("Request to activate an account with token {}", token);
    match VerificationService::redeem(db.get_ref(), token, Utc::now().naive_utc()).await? {
        RedeemOutcome::Activated => Ok(HttpResponse::Ok()
            .json(MessageResponse::new("Account activated successfully, you can now sign in"))),
        RedeemOutcome::Expired => Err(ServiceError::Expired),
        RedeemOutcome::NotFound => Err(ServiceError::NotFound("verification token")),
    }
}

fn forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(serde_json::json!({
        "error": "Administrator role required"
    }))
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .service(list)
            .service(find_by_email)
            .service(find_by_cpf)
            .service(register)
            .service(update)
            .service(activate)
            .service(deactivate)
            .service(resend_activation)
            .service(owned_vehicles)
            .service(find_by_id)
            .service(remove),
    );
}
