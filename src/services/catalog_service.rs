use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::error::ServiceError;
use crate::models::dto::{
    ManufacturerRequest, UpdateManufacturerRequest, UpdateVehicleModelRequest, VehicleModelRequest,
};
use crate::models::{manufacturers, vehicle_models, vehicles};

/// Manufacturer catalog. Names are unique; deleting a manufacturer detaches
/// its models (same guard shape as role deletion) instead of leaving them
/// pointing at a missing row.
pub struct ManufacturerService;

impl ManufacturerService {
    pub async fn list(
        db: &DatabaseConnection,
        ordered: bool,
    ) -> Result<Vec<manufacturers::Model>, ServiceError> {
        let mut query = manufacturers::Entity::find();
        if ordered {
            query = query.order_by_asc(manufacturers::Column::Name);
        }
        query.all(db).await.map_err(ServiceError::from)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i64,
    ) -> Result<manufacturers::Model, ServiceError> {
        manufacturers::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("manufacturer"))
    }

    pub async fn find_by_name(
        db: &DatabaseConnection,
        name: &str,
    ) -> Result<manufacturers::Model, ServiceError> {
        manufacturers::Entity::find()
            .filter(manufacturers::Column::Name.eq(name))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("manufacturer"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        req: ManufacturerRequest,
    ) -> Result<manufacturers::Model, ServiceError> {
        if Self::name_taken(db, &req.name, None).await? {
            return Err(ServiceError::UniqueViolation("manufacturer name"));
        }
        let manufacturer = manufacturers::ActiveModel {
            name: Set(req.name),
            version: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await?;
        log::info!("Manufacturer {} saved to the database", manufacturer.name);
        Ok(manufacturer)
    }

    pub async fn update(
        db: &DatabaseConnection,
        req: UpdateManufacturerRequest,
    ) -> Result<manufacturers::Model, ServiceError> {
        if Self::name_taken(db, &req.name, Some(req.id)).await? {
            return Err(ServiceError::UniqueViolation("manufacturer name"));
        }

        let result = manufacturers::Entity::update_many()
            .col_expr(manufacturers::Column::Name, Expr::value(req.name))
            .col_expr(
                manufacturers::Column::Version,
                Expr::col(manufacturers::Column::Version).add(1),
            )
            .filter(manufacturers::Column::Id.eq(req.id))
            .filter(manufacturers::Column::Version.eq(req.version))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return match manufacturers::Entity::find_by_id(req.id).one(db).await? {
                Some(_) => Err(ServiceError::StaleState("manufacturer")),
                None => Err(ServiceError::NotFound("manufacturer")),
            };
        }

        Self::find_by_id(db, req.id).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
        let manufacturer = Self::find_by_id(db, id).await?;

        let txn = db.begin().await?;
        vehicle_models::Entity::update_many()
            .col_expr(vehicle_models::Column::ManufacturerId, Expr::value(Option::<i64>::None))
            .col_expr(
                vehicle_models::Column::Version,
                Expr::col(vehicle_models::Column::Version).add(1),
            )
            .filter(vehicle_models::Column::ManufacturerId.eq(id))
            .exec(&txn)
            .await?;
        manufacturers::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Manufacturer {} DELETED from the system", manufacturer.name);
        Ok(())
    }

    async fn name_taken(
        db: &DatabaseConnection,
        name: &str,
        excluding: Option<i64>,
    ) -> Result<bool, ServiceError> {
        let mut query = manufacturers::Entity::find().filter(manufacturers::Column::Name.eq(name));
        if let Some(id) = excluding {
            query = query.filter(manufacturers::Column::Id.ne(id));
        }
        Ok(query.one(db).await?.is_some())
    }
}

/// Vehicle-model catalog, many-to-one to its manufacturer.
pub struct VehicleModelService;

impl VehicleModelService {
    pub async fn list(
        db: &DatabaseConnection,
        ordered: bool,
    ) -> Result<Vec<vehicle_models::Model>, ServiceError> {
        let mut query = vehicle_models::Entity::find();
        if ordered {
            query = query.order_by_asc(vehicle_models::Column::Name);
        }
        query.all(db).await.map_err(ServiceError::from)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i64,
    ) -> Result<vehicle_models::Model, ServiceError> {
        vehicle_models::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("vehicle model"))
    }

    pub async fn create(
        db: &DatabaseConnection,
        req: VehicleModelRequest,
    ) -> Result<vehicle_models::Model, ServiceError> {
        if let Some(manufacturer_id) = req.manufacturer_id {
            ManufacturerService::find_by_id(db, manufacturer_id).await?;
        }
        let model = vehicle_models::ActiveModel {
            name: Set(req.name),
            version: Set(0),
            manufacturer_id: Set(req.manufacturer_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        log::info!("Vehicle model {} saved to the database", model.name);
        Ok(model)
    }

    pub async fn update(
        db: &DatabaseConnection,
        req: UpdateVehicleModelRequest,
    ) -> Result<vehicle_models::Model, ServiceError> {
        if let Some(manufacturer_id) = req.manufacturer_id {
            ManufacturerService::find_by_id(db, manufacturer_id).await?;
        }

        let result = vehicle_models::Entity::update_many()
            .col_expr(vehicle_models::Column::Name, Expr::value(req.name))
            .col_expr(vehicle_models::Column::ManufacturerId, Expr::value(req.manufacturer_id))
            .col_expr(
                vehicle_models::Column::Version,
                Expr::col(vehicle_models::Column::Version).add(1),
            )
            .filter(vehicle_models::Column::Id.eq(req.id))
            .filter(vehicle_models::Column::Version.eq(req.version))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return match vehicle_models::Entity::find_by_id(req.id).one(db).await? {
                Some(_) => Err(ServiceError::StaleState("vehicle model")),
                None => Err(ServiceError::NotFound("vehicle model")),
            };
        }

        Self::find_by_id(db, req.id).await
    }

    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
        let model = Self::find_by_id(db, id).await?;

        let txn = db.begin().await?;
        vehicles::Entity::update_many()
            .col_expr(vehicles::Column::ModelId, Expr::value(Option::<i64>::None))
            .col_expr(vehicles::Column::Version, Expr::col(vehicles::Column::Version).add(1))
            .filter(vehicles::Column::ModelId.eq(id))
            .exec(&txn)
            .await?;
        vehicle_models::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        log::info!("Vehicle model {} DELETED from the system", model.name);
        Ok(())
    }
}
