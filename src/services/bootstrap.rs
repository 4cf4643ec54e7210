use sea_orm::*;
use std::env;

use crate::error::ServiceError;
use crate::models::{roles, users};
use crate::utils::password;

const ADMIN_ROLE: &str = "Administrador";
const OWNER_ROLE: &str = "Proprietario";
const DEFAULT_ADMIN_CPF: &str = "53376207704";
const DEFAULT_ADMIN_EMAIL: &str = "admin@fleetcare.com";

/// Seed the baseline roles and a default administrator so a fresh install
/// is usable. Idempotent: existing rows are left alone, and nothing is done
/// when some user already holds the administrator role.
pub async fn seed(db: &DatabaseConnection) -> Result<(), ServiceError> {
    let admin_role = ensure_role(db, ADMIN_ROLE).await?;
    ensure_role(db, OWNER_ROLE).await?;

    let has_admin = users::Entity::find()
        .filter(users::Column::RoleId.eq(admin_role.id))
        .one(db)
        .await?
        .is_some();
    if has_admin {
        log::info!("FleetCare initialized (administrator already present)");
        return Ok(());
    }

    let admin = users::Entity::find()
        .filter(users::Column::Cpf.eq(DEFAULT_ADMIN_CPF))
        .one(db)
        .await?;

    match admin {
        Some(user) => {
            // promote the existing account
            let next_version = user.version + 1;
            let mut record: users::ActiveModel = user.into();
            record.role_id = Set(Some(admin_role.id));
            record.active = Set(true);
            record.version = Set(next_version);
            record.update(db).await?;
        }
        None => {
            let secret =
                env::var("ADMIN_DEFAULT_PASSWORD").unwrap_or_else(|_| "admin-fleetcare".to_string());
            let password_hash = password::hash_password(&secret).map_err(ServiceError::Validation)?;
            users::ActiveModel {
                cpf: Set(DEFAULT_ADMIN_CPF.to_string()),
                name: Set("Administrador".to_string()),
                surname: Set("do FleetCare".to_string()),
                email: Set(DEFAULT_ADMIN_EMAIL.to_string()),
                birth_date: Set("01012024".to_string()),
                phone: Set(String::new()),
                gender: Set(None),
                password_hash: Set(password_hash),
                active: Set(true),
                version: Set(0),
                role_id: Set(Some(admin_role.id)),
                ..Default::default()
            }
            .insert(db)
            .await?;
            log::info!("FleetCare initializing (default administrator created)");
        }
    }

    log::info!("FleetCare initialized (bootstrap complete)");
    Ok(())
}

async fn ensure_role(db: &DatabaseConnection, name: &str) -> Result<roles::Model, ServiceError> {
    let existing = roles::Entity::find()
        .filter(roles::Column::Name.eq(name))
        .one(db)
        .await?;
    if let Some(role) = existing {
        return Ok(role);
    }
    log::info!("FleetCare initializing (creating the {} role)...", name);
    roles::ActiveModel {
        name: Set(name.to_string()),
        version: Set(0),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(ServiceError::from)
}
