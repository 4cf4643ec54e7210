use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::ServiceError;
use crate::middleware::AuthUser;
use crate::models::dto::{MessageResponse, UpdateVehicleModelRequest, VehicleModelRequest};
use crate::services::catalog_service::VehicleModelService;

/// GET /api/models/list/{ordered} - list vehicle models.
#[get("/list/{ordered}")]
pub async fn list(
    _auth_user: AuthUser,
    path: web::Path<bool>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let models = VehicleModelService::list(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(models))
}

/// GET /api/models/{id} - look a vehicle model up by id.
#[get("/{id}")]
pub async fn find_by_id(
    _auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let model = VehicleModelService::find_by_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(model))
}

/// POST /api/models - create a vehicle model, optionally linked to a
/// manufacturer that must already exist.
#[post("")]
pub async fn create(
    _auth_user: AuthUser,
    body: web::Json<VehicleModelRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
    let model = VehicleModelService::create(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(model))
}

/// PUT /api/models - update a vehicle model (optimistic-locked).
#[put("")]
pub async fn update(
    _auth_user: AuthUser,
    body: web::Json<UpdateVehicleModelRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
    let model = VehicleModelService::update(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(model))
}

/// DELETE /api/models/{id} - delete a vehicle model; vehicles of that model
/// are detached, never deleted.
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
    VehicleModelService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Vehicle model DELETED from the system")))
}

pub fn vehicle_model_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/models")
            .service(list)
            .service(create)
            .service(update)
            .service(find_by_id)
            .service(remove),
    );
}
