use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::error::ServiceError;
use crate::models::dto::{UpdateVehicleRequest, VehicleRequest};
use crate::models::{users, vehicles};
use crate::services::catalog_service::VehicleModelService;

pub struct VehicleService;

impl VehicleService {
    pub async fn list(
        db: &DatabaseConnection,
        ordered: bool,
    ) -> Result<Vec<vehicles::Model>, ServiceError> {
        let mut query = vehicles::Entity::find();
        if ordered {
            query = query.order_by_asc(vehicles::Column::Plate);
        }
        query.all(db).await.map_err(ServiceError::from)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i64,
    ) -> Result<vehicles::Model, ServiceError> {
        vehicles::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("vehicle"))
    }

    pub async fn find_by_plate(
        db: &DatabaseConnection,
        plate: &str,
    ) -> Result<vehicles::Model, ServiceError> {
        vehicles::Entity::find()
            .filter(vehicles::Column::Plate.eq(plate))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("vehicle"))
    }

    /// Vehicles owned by a user, resolved on demand.
    pub async fn owned_by(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> Result<Vec<vehicles::Model>, ServiceError> {
        vehicles::Entity::find()
            .filter(vehicles::Column::UserId.eq(user_id))
            .all(db)
            .await
            .map_err(ServiceError::from)
    }

    pub async fn create(
        db: &DatabaseConnection,
        req: VehicleRequest,
    ) -> Result<vehicles::Model, ServiceError> {
        if !req.year.chars().all(|c| c.is_ascii_digit()) {
            return Err(ServiceError::Validation("year must be a 4-digit number".to_string()));
        }
        users::Entity::find_by_id(req.user_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;
        if let Some(model_id) = req.model_id {
            VehicleModelService::find_by_id(db, model_id).await?;
        }

        let vehicle = vehicles::ActiveModel {
            plate: Set(req.plate),
            year: Set(req.year),
            version: Set(0),
            model_id: Set(req.model_id),
            user_id: Set(req.user_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        log::info!("Vehicle {} saved to the database", vehicle.plate);
        Ok(vehicle)
    }

    pub async fn update(
        db: &DatabaseConnection,
        req: UpdateVehicleRequest,
    ) -> Result<vehicles::Model, ServiceError> {
        if !req.year.chars().all(|c| c.is_ascii_digit()) {
            return Err(ServiceError::Validation("year must be a 4-digit number".to_string()));
        }
        if let Some(model_id) = req.model_id {
            VehicleModelService::find_by_id(db, model_id).await?;
        }

        let result = vehicles::Entity::update_many()
            .col_expr(vehicles::Column::Plate, Expr::value(req.plate))
            .col_expr(vehicles::Column::Year, Expr::value(req.year))
            .col_expr(vehicles::Column::ModelId, Expr::value(req.model_id))
            .col_expr(vehicles::Column::Version, Expr::col(vehicles::Column::Version).add(1))
            .filter(vehicles::Column::Id.eq(req.id))
            .filter(vehicles::Column::Version.eq(req.version))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return match vehicles::Entity::find_by_id(req.id).one(db).await? {
                Some(_) => Err(ServiceError::StaleState("vehicle")),
                None => Err(ServiceError::NotFound("vehicle")),
            };
        }

        Self::find_by_id(db, req.id).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
        let vehicle = Self::find_by_id(db, id).await?;
        vehicles::Entity::delete_by_id(id).exec(db).await?;
        log::info!("Vehicle {} DELETED from the system", vehicle.plate);
        Ok(())
    }
}
