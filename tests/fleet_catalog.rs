mod common;

use sea_orm::EntityTrait;

use fleetcare_backend::error::ServiceError;
use fleetcare_backend::models::dto::{
    ManufacturerRequest, UpdateManufacturerRequest, VehicleModelRequest, VehicleRequest,
};
use fleetcare_backend::models::{vehicle_models, vehicles};
use fleetcare_backend::services::catalog_service::{ManufacturerService, VehicleModelService};
use fleetcare_backend::services::vehicle_service::VehicleService;

use common::CPF_PRIMARY;

async fn manufacturer(
    db: &sea_orm::DatabaseConnection,
    name: &str,
) -> fleetcare_backend::models::manufacturers::Model {
    ManufacturerService::create(db, ManufacturerRequest { name: name.to_string() })
        .await
        .expect("manufacturer")
}

#[tokio::test]
async fn manufacturer_names_are_unique() {
    let db = common::setup_db().await;
    manufacturer(&db, "Volkswagen").await;

    let duplicate =
        ManufacturerService::create(&db, ManufacturerRequest { name: "Volkswagen".to_string() })
            .await;
    assert!(matches!(duplicate, Err(ServiceError::UniqueViolation("manufacturer name"))));
}

#[tokio::test]
async fn manufacturer_update_enforces_the_version_check() {
    let db = common::setup_db().await;
    let vw = manufacturer(&db, "Volkswagem").await;

    let renamed = ManufacturerService::update(
        &db,
        UpdateManufacturerRequest {
            id: vw.id,
            name: "Volkswagen".to_string(),
            version: vw.version,
        },
    )
    .await
    .expect("rename");
    assert_eq!(renamed.name, "Volkswagen");
    assert_eq!(renamed.version, vw.version + 1);

    let stale = ManufacturerService::update(
        &db,
        UpdateManufacturerRequest {
            id: vw.id,
            name: "VW do Brasil".to_string(),
            version: vw.version,
        },
    )
    .await;
    assert!(matches!(stale, Err(ServiceError::StaleState("manufacturer"))));
}

#[tokio::test]
async fn deleting_a_manufacturer_detaches_its_models() {
    let db = common::setup_db().await;
    let vw = manufacturer(&db, "Volkswagen").await;
    let gol = VehicleModelService::create(
        &db,
        VehicleModelRequest { name: "Gol".to_string(), manufacturer_id: Some(vw.id) },
    )
    .await
    .expect("model");

    ManufacturerService::delete(&db, vw.id).await.expect("delete manufacturer");

    let gol = vehicle_models::Entity::find_by_id(gol.id)
        .one(&db)
        .await
        .expect("query")
        .expect("model survives its manufacturer");
    assert_eq!(gol.manufacturer_id, None);
    assert_eq!(gol.version, 1);
}

#[tokio::test]
async fn a_model_cannot_reference_a_missing_manufacturer() {
    let db = common::setup_db().await;
    let result = VehicleModelService::create(
        &db,
        VehicleModelRequest { name: "Gol".to_string(), manufacturer_id: Some(999) },
    )
    .await;
    assert!(matches!(result, Err(ServiceError::NotFound("manufacturer"))));
}

#[tokio::test]
async fn deleting_a_model_detaches_its_vehicles() {
    let db = common::setup_db().await;
    let (owner, _) = common::register_user(&db, CPF_PRIMARY, "fulano@email.com").await;
    let gol = VehicleModelService::create(
        &db,
        VehicleModelRequest { name: "Gol".to_string(), manufacturer_id: None },
    )
    .await
    .expect("model");
    let car = VehicleService::create(
        &db,
        VehicleRequest {
            plate: "ABC1D23".to_string(),
            year: "2020".to_string(),
            model_id: Some(gol.id),
            user_id: owner.id,
        },
    )
    .await
    .expect("vehicle");

    VehicleModelService::delete(&db, gol.id).await.expect("delete model");

    let car = vehicles::Entity::find_by_id(car.id)
        .one(&db)
        .await
        .expect("query")
        .expect("vehicle survives its model");
    assert_eq!(car.model_id, None);
    assert_eq!(car.version, 1);
}

#[tokio::test]
async fn a_vehicle_requires_an_existing_owner() {
    let db = common::setup_db().await;
    let result = VehicleService::create(
        &db,
        VehicleRequest {
            plate: "ABC1D23".to_string(),
            year: "2020".to_string(),
            model_id: None,
            user_id: 999,
        },
    )
    .await;
    assert!(matches!(result, Err(ServiceError::NotFound("user"))));
}

#[tokio::test]
async fn a_vehicle_year_must_be_numeric() {
    let db = common::setup_db().await;
    let (owner, _) = common::register_user(&db, CPF_PRIMARY, "fulano@email.com").await;
    let result = VehicleService::create(
        &db,
        VehicleRequest {
            plate: "ABC1D23".to_string(),
            year: "20x0".to_string(),
            model_id: None,
            user_id: owner.id,
        },
    )
    .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}
