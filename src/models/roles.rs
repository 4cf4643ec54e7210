use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Access level a user may hold ("Administrador", "Proprietario", ...).
/// Names are unique and capitalized on write. Users referencing a role are
/// looked up on demand, never held as an in-memory collection; deleting a
/// role first clears `role_id` on every dependent user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
