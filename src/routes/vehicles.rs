use actix_web::{HttpResponse, delete, get, post, put, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::error::ServiceError;
use crate::middleware::AuthUser;
use crate::models::dto::{MessageResponse, UpdateVehicleRequest, VehicleRequest};
use crate::services::vehicle_service::VehicleService;

/// GET /api/vehicles/list/{ordered} - list vehicles, by plate when ordered.
#[get("/list/{ordered}")]
pub async fn list(
    _auth_user: AuthUser,
    path: web::Path<bool>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let vehicles = VehicleService::list(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(vehicles))
}

/// GET /api/vehicles/plate/{plate} - look a vehicle up by plate.
#[get("/plate/{plate}")]
pub async fn find_by_plate(
    _auth_user: AuthUser,
    path: web::Path<String>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let vehicle = VehicleService::find_by_plate(db.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(vehicle))
}

/// GET /api/vehicles/{id} - look a vehicle up by id.
#[get("/{id}")]
pub async fn find_by_id(
    _auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    let vehicle = VehicleService::find_by_id(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(vehicle))
}

/// POST /api/vehicles - register a vehicle for an existing owner.
#[post("")]
pub async fn create(
    _auth_user: AuthUser,
    body: web::Json<VehicleRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
    let vehicle = VehicleService::create(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(vehicle))
}

/// PUT /api/vehicles - update a vehicle (optimistic-locked by `version`).
#[put("")]
pub async fn update(
    _auth_user: AuthUser,
    body: web::Json<UpdateVehicleRequest>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    body.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
    let vehicle = VehicleService::update(db.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(vehicle))
}

/// DELETE /api/vehicles/{id} - delete a vehicle.
#[delete("/{id}")]
pub async fn remove(
    _auth_user: AuthUser,
    path: web::Path<i64>,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ServiceError> {
    VehicleService::delete(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Vehicle DELETED from the system")))
}

pub fn vehicle_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vehicles")
            .service(list)
            .service(find_by_plate)
            .service(create)
            .service(update)
            .service(find_by_id)
            .service(remove),
    );
}
