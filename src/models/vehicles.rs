use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A fleet vehicle: plate (min 5 chars), 4-digit year string, many-to-one
/// model and owning user. Deleting the owner cascades deletion of the
/// vehicle (remove-orphan semantics, enforced in the user service).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub plate: String,
    pub year: String,
    pub version: i64,
    pub model_id: Option<i64>,
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vehicle_models::Entity",
        from = "Column::ModelId",
        to = "super::vehicle_models::Column::Id"
    )]
    VehicleModel,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::vehicle_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VehicleModel.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
