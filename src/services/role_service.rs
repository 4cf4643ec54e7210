use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::error::ServiceError;
use crate::models::dto::{RoleRequest, UpdateRoleRequest};
use crate::models::{roles, users};
use crate::utils::strings;

pub struct RoleService;

impl RoleService {
    pub async fn list(
        db: &DatabaseConnection,
        ordered: bool,
    ) -> Result<Vec<roles::Model>, ServiceError> {
        log::info!("Fetching a listing of all access levels...");
        let mut query = roles::Entity::find();
        if ordered {
            query = query.order_by_asc(roles::Column::Name);
        }
        query.all(db).await.map_err(ServiceError::from)
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: i64) -> Result<roles::Model, ServiceError> {
        roles::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("role"))
    }

    /// Stored names are capitalized, so the lookup capitalizes before the
    /// exact-match compare.
    pub async fn find_by_name(
        db: &DatabaseConnection,
        name: &str,
    ) -> Result<roles::Model, ServiceError> {
        roles::Entity::find()
            .filter(roles::Column::Name.eq(strings::capitalize(name)))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("role"))
    }

    /// Users currently holding a role, resolved on demand (no in-memory
    /// back-collection).
    pub async fn users_holding(
        db: &DatabaseConnection,
        role_id: i64,
    ) -> Result<Vec<users::Model>, ServiceError> {
        users::Entity::find()
            .filter(users::Column::RoleId.eq(role_id))
            .all(db)
            .await
            .map_err(ServiceError::from)
    }

    pub async fn create(
        db: &DatabaseConnection,
        req: RoleRequest,
    ) -> Result<roles::Model, ServiceError> {
        let name = strings::capitalize(&req.name);
        if Self::name_taken(db, &name, None).await? {
            return Err(ServiceError::UniqueViolation("role name"));
        }

        let role = roles::ActiveModel {
            name: Set(name),
            version: Set(0),
            ..Default::default()
        }
        .insert(db)
        .await?;
        log::info!("Access level {} saved to the database", role.name);
        Ok(role)
    }

    pub async fn update(
        db: &DatabaseConnection,
        req: UpdateRoleRequest,
    ) -> Result<roles::Model, ServiceError> {
        let name = strings::capitalize(&req.name);
        if Self::name_taken(db, &name, Some(req.id)).await? {
            return Err(ServiceError::UniqueViolation("role name"));
        }

        let result = roles::Entity::update_many()
            .col_expr(roles::Column::Name, Expr::value(name))
            .col_expr(roles::Column::Version, Expr::col(roles::Column::Version).add(1))
            .filter(roles::Column::Id.eq(req.id))
            .filter(roles::Column::Version.eq(req.version))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return match roles::Entity::find_by_id(req.id).one(db).await? {
                Some(_) => Err(ServiceError::StaleState("role")),
                None => Err(ServiceError::NotFound("role")),
            };
        }

        Self::find_by_id(db, req.id).await
    }

    /// Delete a role. Every user still holding it has the reference cleared
    /// first (a user with no role is a valid guest-level identity); only
    /// then is the role row removed, so no dangling role_id ever survives.
    /// Returns how many users were detached.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<u64, ServiceError> {
        let role = Self::find_by_id(db, id).await?;

        let txn = db.begin().await?;
        let detached = users::Entity::update_many()
            .col_expr(users::Column::RoleId, Expr::value(Option::<i64>::None))
            .col_expr(users::Column::Version, Expr::col(users::Column::Version).add(1))
            .filter(users::Column::RoleId.eq(id))
            .exec(&txn)
            .await?;
        roles::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        log::info!(
            "Access level {} DELETED ({} users detached)",
            role.name,
            detached.rows_affected
        );
        Ok(detached.rows_affected)
    }

    async fn name_taken(
        db: &DatabaseConnection,
        name: &str,
        excluding: Option<i64>,
    ) -> Result<bool, ServiceError> {
        let mut query = roles::Entity::find().filter(roles::Column::Name.eq(name));
        if let Some(id) = excluding {
            query = query.filter(roles::Column::Id.ne(id));
        }
        Ok(query.one(db).await?.is_some())
    }
}
