//! Order entity - A ticket header opened by an employee.
//!
//! An order owns its lines (and through them the line extras). The taking
//! user is only referenced: deleting the user clears `user_id` and keeps the
//! order for the books.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the ticket was opened (server-local time)
    pub created_at: DateTime,
    /// When the ticket was paid and closed, if it has been
    pub closed_at: Option<DateTime>,
    /// Name the client gave at the counter
    pub client_name: Option<String>,
    /// Table the order is served to
    pub table_number: Option<i32>,
    /// Amount charged for the whole ticket
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    #[serde(with = "crate::money::two_places")]
    pub total: Decimal,
    /// Employee who took the order; cleared if that user is deleted
    pub user_id: Option<i64>,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    User,
    /// Lines of the ticket, deleted with it
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderedItems,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderedItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
