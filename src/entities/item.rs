//! Item entity - A priced catalog entry.
//!
//! Each item optionally belongs to a group and owns its flavor and extra
//! variants. Order lines reference items but do not own them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short name printed on tickets
    pub name: String,
    /// Longer menu description
    pub description: String,
    /// Base price of one unit
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    #[serde(with = "crate::money::two_places")]
    pub price: Decimal,
    /// Owning group, if any
    pub group_id: Option<i64>,
}

/// Defines relationships between Item and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each item may belong to one group
    #[sea_orm(
        belongs_to = "super::group::Entity",
        from = "Column::GroupId",
        to = "super::group::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Group,
    /// Flavor variants, deleted with the item
    #[sea_orm(has_many = "super::flavor::Entity")]
    Flavors,
    /// Extra add-ons, deleted with the item
    #[sea_orm(has_many = "super::extra::Entity")]
    Extras,
    /// Order lines that sold this item
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderedItems,
}

impl Related<super::group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::flavor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flavors.def()
    }
}

impl Related<super::extra::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Extras.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderedItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
