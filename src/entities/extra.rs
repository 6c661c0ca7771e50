//! Extra entity - A priced add-on for one item (e.g. "Extra cheese").
//!
//! Extras are attached to order lines through `order_item_extra`, which keeps
//! a reference but never owns the extra.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Extra database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "extra")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub description: String,
    /// Price of one unit of the add-on
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    #[serde(with = "crate::money::two_places")]
    pub price: Decimal,
    pub item_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
