use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::ServiceError;
use crate::middleware::AuthUser;
use crate::models::dto::{MessageResponse, RoleRequest, UpdateRoleRequest};
use crate::services::role_service::RoleService;

/// GET /api/roles/list/{ordered} - list roles, by name when ordered.
#[get("/list/{ordered}")]
pub async fn list(
    _auth_user: AuthUser,
    path: web::Path<bool>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let roles = RoleService::list(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(roles))
}

/// GET /api/roles/name/{name} - look a role up by name (capitalized first).
#[get("/name/{name}")]
pub async fn find_by_name(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let role = RoleService::find_by_name(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(role))
}

/// GET /api/roles/{id} - look a role up by id.
#[get("/{id}")]
pub async fn find_by_id(
    _auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let role = RoleService::find_by_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(role))
}

/// GET /api/roles/{id}/users - users currently holding a role.
#[get("/{id}/users")]
pub async fn holders(
    _auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let id = path.into_inner();
    RoleService::find_by_id(db.get_ref(), id).await?;
    let users = RoleService::users_holding(db.get_ref(), id).await?;
    let users: Vec<crate::models::dto::UserResponse> =
        users.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/roles - create a role.
#[post("")]
pub async fn create(
    auth_user: AuthUser,
    body: web::Json<RoleRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    if !auth_user.is_admin() {
        return Ok(forbidden());
    }
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
    let role = RoleService::create(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(role))
}

/// PUT /api/roles - rename a role (optimistic-locked by `version`).
#[put("")]
pub async fn update(
    auth_user: AuthUser,
    body: web::Json<UpdateRoleRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    if !auth_user.is_admin() {
        return Ok(forbidden());
    }
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
    let role = RoleService::update(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(role))
}

/// DELETE /api/roles/{id} - delete a role; holders are detached, never
/// deleted.
#[delete("/{id}")]
pub async fn remove(
    auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    if !auth_user.is_admin() {
        return Ok(forbidden());
    }
    let detached = RoleService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Role DELETED from the system ({} user(s) detached)",
        detached
    ))))
}

fn forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(serde_json::json!({
        "error": "Administrator role required"
    }))
}

pub fn role_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/roles")
            .service(list)
            .service(find_by_name)
            .service(create)
            .service(update)
            .service(holders)
            .service(find_by_id)
            .service(remove),
    );
}
