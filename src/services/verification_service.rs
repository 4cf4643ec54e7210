use chrono::{Duration, NaiveDateTime};
use sea_orm::*;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::{users, verification_tokens};

/// Validity window granted on every issue/renew: 1,500,000 ms (25 minutes).
pub const TOKEN_VALIDITY_MS: i64 = 1_500_000;

/// Three-way redemption outcome. The caller renders the result; the token
/// row itself is gone in the Activated and Expired cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    Activated,
    Expired,
    NotFound,
}

pub struct VerificationService;

impl VerificationService {
    fn expiry_from(now: NaiveDateTime) -> NaiveDateTime {
        now + Duration::milliseconds(TOKEN_VALIDITY_MS)
    }

    /// Issue a verification token for a user, reusing the existing row when
    /// one is present (the UUID and expiry are overwritten either way, so a
    /// user never holds two live tokens). Returns the token string for the
    /// activation link. The UUID and the clock reading are supplied by the
    /// caller.
    pub async fn issue_or_renew<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        code: Uuid,
        now: NaiveDateTime,
    ) -> Result<String, ServiceError> {
        let token = code.to_string();
        let expires_at = Self::expiry_from(now);

        let existing = verification_tokens::Entity::find()
            .filter(verification_tokens::Column::UserId.eq(user_id))
            .one(conn)
            .await?;

        match existing {
            Some(record) => {
                log::info!(
                    "Found an activation token for user {}, extending it for another 25 minutes",
                    user_id
                );
                let mut active: verification_tokens::ActiveModel = record.into();
                active.token = Set(token.clone());
                active.expires_at = Set(expires_at);
                active.update(conn).await?;
            }
            None => {
                log::info!("Creating a new activation token for user {}", user_id);
                verification_tokens::ActiveModel {
                    token: Set(token.clone()),
                    expires_at: Set(expires_at),
                    user_id: Set(user_id),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
            }
        }

        Ok(token)
    }

    /// Redeem a token. Redemption is destructive in every found case: the
    /// row is deleted whether the token was still valid or already expired,
    /// so a leaked or replayed code is useless after the first attempt. The
    /// user is activated only when the token has not expired. Runs in a
    /// single transaction; a concurrent second redemption sees NotFound.
    pub async fn redeem(
        db: &DatabaseConnection,
        code: Uuid,
        now: NaiveDateTime,
    ) -> Result<RedeemOutcome, ServiceError> {
        let txn = db.begin().await?;

        let Some(record) = verification_tokens::Entity::find()
            .filter(verification_tokens::Column::Token.eq(code.to_string()))
            .one(&txn)
            .await?
        else {
            txn.commit().await?;
            log::info!("Account activation failed: token {} not found", code);
            return Ok(RedeemOutcome::NotFound);
        };

        let outcome = if record.expires_at < now {
            log::info!("Account activation failed: token {} expired", code);
            RedeemOutcome::Expired
        } else {
            let user = users::Entity::find_by_id(record.user_id)
                .one(&txn)
                .await?
                .ok_or(ServiceError::NotFound("user"))?;
            let email = user.email.clone();
            let next_version = user.version + 1;
            let mut active: users::ActiveModel = user.into();
            active.active = Set(true);
            active.version = Set(next_version);
            active.update(&txn).await?;
            log::info!("Account {} activated successfully", email);
            RedeemOutcome::Activated
        };

        // single-use cleanup, regardless of outcome
        verification_tokens::Entity::delete_by_id(record.id)
            .exec(&txn)
            .await?;
        txn.commit().await?;

        Ok(outcome)
    }

    /// Drop the token held by a user, if any. Called before hard-deleting a
    /// user so no token row is left pointing at a missing owner.
    pub async fn delete_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
    ) -> Result<(), ServiceError> {
        let deleted = verification_tokens::Entity::delete_many()
            .filter(verification_tokens::Column::UserId.eq(user_id))
            .exec(conn)
            .await?;
        if deleted.rows_affected > 0 {
            log::info!("Deleted the activation token of user {}", user_id);
        }
        Ok(())
    }

    /// Look up the live token of a user, if any.
    pub async fn find_for_user(
        db: &DatabaseConnection,
        user_id: i64,
    ) -> Result<Option<verification_tokens::Model>, ServiceError> {
        verification_tokens::Entity::find()
            .filter(verification_tokens::Column::UserId.eq(user_id))
            .one(db)
            .await
            .map_err(ServiceError::from)
    }
}
