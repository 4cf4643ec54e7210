// ============================================================================
// MODEL: VERIFICATION TOKENS
// ============================================================================
//
// Columns of the verification_tokens table:
//   - id (BIGINT, PRIMARY KEY)
//   - token (VARCHAR, UNIQUE, NOT NULL) - UUID v4
//   - expires_at (TIMESTAMP, NOT NULL) - issued_at + 25 minutes
//   - user_id (BIGINT, UNIQUE, NOT NULL, FK to users)
//
// Workflow:
//   1. User registers (or asks to resend the activation email)
//   2. Backend reuses the user's existing row if one exists, otherwise
//      inserts a new one; either way the UUID and expiry are refreshed
//   3. Backend emails a link containing the token:
//      {base_url}/usuario/uuid/{token}
//   4. User follows the link; backend checks existence and expiry
//   5. On a valid token the user is activated; in every found case the
//      row is deleted (single-use, no replay)
//
// The UNIQUE constraint on user_id is what guarantees at most one live
// token per user even under concurrent issuance: the second writer lands
// on the same row or fails uniqueness.
//
// Expired-but-unredeemed rows linger until someone attempts redemption or
// the owning user is deleted; there is no background sweeper.
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "verification_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub token: String,

    pub expires_at: DateTime,

    #[sea_orm(unique)]
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
