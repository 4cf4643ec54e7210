use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::strings;

/// A registered collaborator. The CPF is the natural key and is stored
/// unformatted (11 digits); email is stored lowercase-trimmed; `active`
/// stays false until the account is verified through the emailed token.
/// `version` is the optimistic-lock counter checked on every update.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub cpf: String,
    pub name: String,
    pub surname: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Stored digits-only as ddmmyyyy.
    pub birth_date: String,
    /// Stored digits-only: DDD + number (10 or 11 digits).
    pub phone: String,
    pub gender: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub version: i64,
    pub role_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id"
    )]
    Role,

    #[sea_orm(has_many = "super::vehicles::Entity")]
    Vehicle,

    #[sea_orm(has_one = "super::verification_tokens::Entity")]
    VerificationToken,
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::vehicles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vehicle.def()
    }
}

impl Related<super::verification_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VerificationToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// CPF formatted for display: NNN.NNN.NNN-NN.
    pub fn formatted_cpf(&self) -> String {
        strings::format_cpf(&self.cpf)
    }

    /// Phone formatted for display per the 10/11-digit rule.
    pub fn formatted_phone(&self) -> String {
        strings::format_phone(&self.phone)
    }

    /// Birth date formatted for display: dd/mm/yyyy.
    pub fn formatted_birth_date(&self) -> String {
        strings::format_birth_date(&self.birth_date)
    }
}
