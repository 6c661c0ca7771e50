//! Catalog business logic - groups, items and their flavor/extra variants.
//!
//! Deleting a group removes its items, and deleting an item removes its
//! flavors and extras. Both are refused while an order line still references
//! something that would go away.

use crate::{
    entities::{Extra, Flavor, Group, Item, extra, flavor, group, item},
    errors::{Error, Result},
    schemas::{NewGroup, NewItem, NewVariant, Validate},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use tracing::{info, instrument};

/// A group with its items, loaded eagerly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupWithItems {
    pub group: group::Model,
    pub items: Vec<item::Model>,
}

/// An item with all of its variants, loaded eagerly
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWithVariants {
    pub item: item::Model,
    pub flavors: Vec<flavor::Model>,
    pub extras: Vec<extra::Model>,
}

async fn require_item<C>(db: &C, item_id: i64) -> Result<item::Model>
where
    C: ConnectionTrait,
{
    Item::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "item",
            id: item_id,
        })
}

/// Validates and inserts a new group.
#[instrument(skip(db))]
pub async fn create_group(db: &DatabaseConnection, new_group: NewGroup) -> Result<group::Model> {
    new_group.validate()?;
    let created = group::ActiveModel {
        description: Set(new_group.description.trim().to_string()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(group_id = created.id, "Created group");
    Ok(created)
}

/// All groups, alphabetically.
pub async fn list_groups(db: &DatabaseConnection) -> Result<Vec<group::Model>> {
    Group::find()
        .order_by_asc(group::Column::Description)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads a group and its items in one call.
pub async fn get_group_with_items(
    db: &DatabaseConnection,
    group_id: i64,
) -> Result<GroupWithItems> {
    let group = Group::find_by_id(group_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "group",
            id: group_id,
        })?;
    let items = group
        .find_related(Item)
        .order_by_asc(item::Column::Name)
        .all(db)
        .await?;
    Ok(GroupWithItems { group, items })
}

/// Validates and inserts a new item, checking that its group exists.
#[instrument(skip(db))]
pub async fn create_item(db: &DatabaseConnection, new_item: NewItem) -> Result<item::Model> {
    new_item.validate()?;

    if let Some(group_id) = new_item.group_id {
        Group::find_by_id(group_id)
            .one(db)
            .await?
            .ok_or(Error::NotFound {
                entity: "group",
                id: group_id,
            })?;
    }

    let created = item::ActiveModel {
        name: Set(new_item.name.trim().to_string()),
        description: Set(new_item.description.trim().to_string()),
        price: Set(new_item.price),
        group_id: Set(new_item.group_id),
        ..Default::default()
    }
    .insert(db)
    .await?;
    info!(item_id = created.id, "Created item");
    Ok(created)
}

/// Adds a flavor to an existing item.
#[instrument(skip(db))]
pub async fn add_flavor(
    db: &DatabaseConnection,
    item_id: i64,
    variant: NewVariant,
) -> Result<flavor::Model> {
    variant.validate()?;
    require_item(db, item_id).await?;

    flavor::ActiveModel {
        description: Set(variant.description.trim().to_string()),
        price: Set(variant.price),
        item_id: Set(item_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Adds an extra to an existing item.
#[instrument(skip(db))]
pub async fn add_extra(
    db: &DatabaseConnection,
    item_id: i64,
    variant: NewVariant,
) -> Result<extra::Model> {
    variant.validate()?;
    require_item(db, item_id).await?;

    extra::ActiveModel {
        description: Set(variant.description.trim().to_string()),
        price: Set(variant.price),
        item_id: Set(item_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Loads an item together with its flavors and extras.
pub async fn get_item_with_variants(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<ItemWithVariants> {
    let item = require_item(db, item_id).await?;
    let flavors = item
        .find_related(Flavor)
        .order_by_asc(flavor::Column::Id)
        .all(db)
        .await?;
    let extras = item
        .find_related(Extra)
        .order_by_asc(extra::Column::Id)
        .all(db)
        .await?;
    Ok(ItemWithVariants {
        item,
        flavors,
        extras,
    })
}

/// Deletes a group with all its items, flavors and extras.
#[instrument(skip(db))]
pub async fn delete_group(db: &DatabaseConnection, group_id: i64) -> Result<()> {
    let result = Group::delete_by_id(group_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "group",
            id: group_id,
        });
    }
    info!("Deleted group");
    Ok(())
}

/// Deletes an item with its flavors and extras.
#[instrument(skip(db))]
pub async fn delete_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let result = Item::delete_by_id(item_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "item",
            id: item_id,
        });
    }
    info!("Deleted item");
    Ok(())
}
