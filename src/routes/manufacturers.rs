use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::ServiceError;
use crate::middleware::AuthUser;
use crate::models::dto::{ManufacturerRequest, MessageResponse, UpdateManufacturerRequest};
use crate::services::catalog_service::ManufacturerService;

/// GET /api/manufacturers/list/{ordered} - list manufacturers.
#[get("/list/{ordered}")]
pub async fn list(
    _auth_user: AuthUser,
    path: web::Path<bool>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let manufacturers = ManufacturerService::list(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(manufacturers))
}

/// GET /api/manufacturers/name/{name} - look a manufacturer up by name.
#[get("/name/{name}")]
pub async fn find_by_name(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let manufacturer = ManufacturerService::find_by_name(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(manufacturer))
}

/// GET /api/manufacturers/{id} - look a manufacturer up by id.
#[get("/{id}")]
pub async fn find_by_id(
    _auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let manufacturer = ManufacturerService::find_by_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(manufacturer))
}

/// POST /api/manufacturers - create a manufacturer.
#[post("")]
pub async fn create(
    _auth_user: AuthUser,
    body: web::Json<ManufacturerRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
    let manufacturer = ManufacturerService::create(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(manufacturer))
}

/// PUT /api/manufacturers - rename a manufacturer (optimistic-locked).
#[put("")]
pub async fn update(
    _auth_user: AuthUser,
    body: web::Json<UpdateManufacturerRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
    let manufacturer = ManufacturerService::update(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(manufacturer))
}

/// DELETE /api/manufacturers/{id} - delete a manufacturer; its models are
/// detached, never deleted.
#[delete("/{id}")]
pub async fn remove(
    auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    if !auth_user.is_admin() {
        return Ok(HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Administrator role required"
        })));
    }
    ManufacturerService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Manufacturer DELETED from the system")))
}

pub fn manufacturer_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/manufacturers")
            .service(list)
            .service(find_by_name)
            .service(create)
            .service(update)
            .service(find_by_id)
            .service(remove),
    );
}
