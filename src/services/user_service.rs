use chrono::NaiveDateTime;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::dto::{RegisterUserRequest, UpdateUserRequest};
use crate::models::{roles, users, vehicles};
use crate::services::verification_service::VerificationService;
use crate::utils::{password, strings};

pub struct UserService;

impl UserService {
    /// List every registered user, optionally ordered by name.
    pub async fn list(
        db: &DatabaseConnection,
        ordered: bool,
    ) -> Result<Vec<users::Model>, ServiceError> {
        let mut query = users::Entity::find();
        if ordered {
            log::info!("Fetching an ORDERED listing of all users...");
            query = query.order_by_asc(users::Column::Name);
        } else {
            log::info!("Fetching a listing of all users...");
        }
        query.all(db).await.map_err(ServiceError::from)
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i64,
    ) -> Result<users::Model, ServiceError> {
        users::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }

    pub async fn find_by_email(
        db: &DatabaseConnection,
        email: &str,
    ) -> Result<users::Model, ServiceError> {
        users::Entity::find()
            .filter(users::Column::Email.eq(strings::normalize_email(email)))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }

    /// CPF lookups always go through the unformatted 11-digit form.
    pub async fn find_by_cpf(
        db: &DatabaseConnection,
        cpf: &str,
    ) -> Result<users::Model, ServiceError> {
        users::Entity::find()
            .filter(users::Column::Cpf.eq(strings::normalize_cpf(cpf)))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }

    /// Register a new, inactive user and issue their activation token in one
    /// transaction. The caller supplies the token UUID and the clock reading
    /// and is responsible for emailing the returned token; a mail failure
    /// must NOT roll the registration back.
    pub async fn register(
        db: &DatabaseConnection,
        req: RegisterUserRequest,
        code: Uuid,
        now: NaiveDateTime,
    ) -> Result<(users::Model, String), ServiceError> {
        let cpf = strings::normalize_cpf(&req.cpf);
        if !strings::validate_cpf(&cpf) {
            return Err(ServiceError::Validation("invalid CPF".to_string()));
        }
        if !strings::validate_password_strength(&req.password) {
            return Err(ServiceError::Validation(
                "password must have at least 8 characters, with upper and lower case letters, \
                 a digit and a symbol"
                    .to_string(),
            ));
        }

        let email = strings::normalize_email(&req.email);

        if Self::cpf_taken(db, &cpf, None).await? {
            return Err(ServiceError::UniqueViolation("CPF"));
        }
        if Self::email_taken(db, &email, None).await? {
            return Err(ServiceError::UniqueViolation("email"));
        }

        // A dangling role reference is rejected rather than silently nulled.
        if let Some(role_id) = req.role_id {
            roles::Entity::find_by_id(role_id)
                .one(db)
                .await?
                .ok_or(ServiceError::NotFound("role"))?;
        }

        let password_hash = password::hash_password(&req.password).map_err(ServiceError::Validation)?;

        let txn = db.begin().await?;

        let user = users::ActiveModel {
            cpf: Set(cpf),
            name: Set(strings::format_name(&req.name)),
            surname: Set(strings::format_name(&req.surname)),
            email: Set(email),
            birth_date: Set(strings::normalize_birth_date(&req.birth_date)),
            phone: Set(strings::normalize_phone(&req.phone)),
            gender: Set(req.gender.clone()),
            password_hash: Set(password_hash),
            active: Set(false),
            version: Set(0),
            role_id: Set(req.role_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let token = VerificationService::issue_or_renew(&txn, user.id, code, now).await?;
        txn.commit().await?;

        log::info!("User {} ({}) saved to the database", user.full_name(), user.formatted_cpf());
        Ok((user, token))
    }

    /// Update a user's mutable fields. The presented `version` must match
    /// the stored row; on mismatch nothing is written and the caller gets a
    /// StaleState conflict to re-fetch and retry. The CPF is the natural key
    /// and is not updatable.
    pub async fn update(
        db: &DatabaseConnection,
        req: UpdateUserRequest,
    ) -> Result<users::Model, ServiceError> {
        let email = strings::normalize_email(&req.email);
        if Self::email_taken(db, &email, Some(req.id)).await? {
            return Err(ServiceError::UniqueViolation("email"));
        }
        if let Some(role_id) = req.role_id {
            roles::Entity::find_by_id(role_id)
                .one(db)
                .await?
                .ok_or(ServiceError::NotFound("role"))?;
        }

        log::info!("Updating user ({}) in the database...", req.id);
        let result = users::Entity::update_many()
            .col_expr(users::Column::Name, Expr::value(strings::format_name(&req.name)))
            .col_expr(users::Column::Surname, Expr::value(strings::format_name(&req.surname)))
            .col_expr(users::Column::Email, Expr::value(email))
            .col_expr(
                users::Column::BirthDate,
                Expr::value(strings::normalize_birth_date(&req.birth_date)),
            )
            .col_expr(users::Column::Phone, Expr::value(strings::normalize_phone(&req.phone)))
            .col_expr(users::Column::Gender, Expr::value(req.gender.clone()))
            .col_expr(users::Column::RoleId, Expr::value(req.role_id))
            .col_expr(users::Column::Version, Expr::col(users::Column::Version).add(1))
            .filter(users::Column::Id.eq(req.id))
            .filter(users::Column::Version.eq(req.version))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            // Distinguish a missing row from a concurrent edit.
            return match users::Entity::find_by_id(req.id).one(db).await? {
                Some(_) => Err(ServiceError::StaleState("user")),
                None => Err(ServiceError::NotFound("user")),
            };
        }

        Self::find_by_id(db, req.id).await
    }

    /// Flip the active flag directly (administrative activate/deactivate).
    pub async fn set_active(
        db: &DatabaseConnection,
        id: i64,
        active: bool,
    ) -> Result<users::Model, ServiceError> {
        let user = Self::find_by_id(db, id).await?;
        let name = user.name.clone();
        let next_version = user.version + 1;
        let mut record: users::ActiveModel = user.into();
        record.active = Set(active);
        record.version = Set(next_version);
        let updated = record.update(db).await?;
        log::info!(
            "User {} {} in the system",
            name,
            if active { "ACTIVATED" } else { "DEACTIVATED" }
        );
        Ok(updated)
    }

    pub async fn change_password(
        db: &DatabaseConnection,
        user_id: i64,
        current: &str,
        new: &str,
    ) -> Result<(), ServiceError> {
        let user = Self::find_by_id(db, user_id).await?;

        let valid = password::verify_password(current, &user.password_hash)
            .map_err(ServiceError::Validation)?;
        if !valid {
            return Err(ServiceError::Validation("current password is incorrect".to_string()));
        }
        if !strings::validate_password_strength(new) {
            return Err(ServiceError::Validation(
                "password must have at least 8 characters, with upper and lower case letters, \
                 a digit and a symbol"
                    .to_string(),
            ));
        }

        let next_version = user.version + 1;
        let mut record: users::ActiveModel = user.into();
        record.password_hash = Set(password::hash_password(new).map_err(ServiceError::Validation)?);
        record.version = Set(next_version);
        record.update(db).await?;
        Ok(())
    }

    /// Hard-delete a user. The verification token is unlinked first and the
    /// user's vehicles are removed with them (remove-orphan semantics), all
    /// in one transaction so no dangling foreign key survives a failure.
    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
        let user = Self::find_by_id(db, id).await?;

        let txn = db.begin().await?;
        VerificationService::delete_for_user(&txn, id).await?;
        let orphaned = vehicles::Entity::delete_many()
            .filter(vehicles::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        users::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        log::info!(
            "User {} DELETED from the system ({} owned vehicles removed)",
            user.full_name(),
            orphaned.rows_affected
        );
        Ok(())
    }

    async fn cpf_taken(
        db: &DatabaseConnection,
        cpf: &str,
        excluding: Option<i64>,
    ) -> Result<bool, ServiceError> {
        let mut query = users::Entity::find().filter(users::Column::Cpf.eq(cpf));
        if let Some(id) = excluding {
            query = query.filter(users::Column::Id.ne(id));
        }
        Ok(query.one(db).await?.is_some())
    }

    async fn email_taken(
        db: &DatabaseConnection,
        email: &str,
        excluding: Option<i64>,
    ) -> Result<bool, ServiceError> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(id) = excluding {
            query = query.filter(users::Column::Id.ne(id));
        }
        Ok(query.one(db).await?.is_some())
    }
}
