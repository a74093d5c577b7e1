//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub reservation_number: String,

    pub user_id: i32,
    pub date_id: i32,

    /// JSON array of ticket line snapshots
    #[sea_orm(column_type = "Text")]
    pub tickets: String,

    /// Basket total in cents
    pub total_cents: i64,

    /// PENDING, CONFIRMED or CANCELLED
    pub status: String,

    #[sea_orm(nullable)]
    pub cancelled_at: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::park_date::Entity",
        from = "Column::DateId",
        to = "super::park_date::Column::Id"
    )]
    ParkDate,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::park_date::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParkDate.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
