//! Order business logic - tickets, their lines and line extras.
//!
//! An order is written as one unit: the header, every line and every line
//! extra are inserted in a single database transaction, or nothing is.
//! Reading is explicit about how much is fetched: [`get_order`] loads the
//! header only, [`get_order_with_items`] loads the whole ticket.

use crate::{
    entities::{
        Extra, Flavor, Item, Order, OrderItem, OrderItemExtra, OrderItemStatus, User, extra,
        flavor, item, order, order_item, order_item_extra,
    },
    errors::{Error, Result},
    schemas::{NewOrder, NewOrderItem, Validate},
};
use chrono::{Local, NaiveDateTime};
use sea_orm::{DatabaseTransaction, IntoActiveModel, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// One extra on a line, with the catalog extra it refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineExtra {
    pub entry: order_item_extra::Model,
    pub extra: extra::Model,
}

/// One order line with its item, flavor and extras
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub line: order_item::Model,
    pub item: item::Model,
    pub flavor: Option<flavor::Model>,
    pub extras: Vec<LineExtra>,
}

/// A fully loaded ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub order: order::Model,
    pub ordered_items: Vec<OrderLine>,
}

async fn insert_line(
    txn: &DatabaseTransaction,
    order_id: i64,
    line: &NewOrderItem,
) -> Result<order_item::Model> {
    let item = Item::find_by_id(line.item_id)
        .one(txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "item",
            id: line.item_id,
        })?;

    if let Some(flavor_id) = line.flavor_id {
        let flavor = Flavor::find_by_id(flavor_id)
            .one(txn)
            .await?
            .ok_or(Error::NotFound {
                entity: "flavor",
                id: flavor_id,
            })?;
        if flavor.item_id != item.id {
            return Err(Error::validation(
                "flavor_id",
                format!("flavor {flavor_id} does not belong to item {}", item.id),
            ));
        }
    }

    let saved = order_item::ActiveModel {
        quantity: Set(line.quantity),
        status: Set(line.status),
        order_id: Set(order_id),
        item_id: Set(item.id),
        flavor_id: Set(line.flavor_id),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    for wanted in &line.extras {
        let extra = Extra::find_by_id(wanted.extra_id)
            .one(txn)
            .await?
            .ok_or(Error::NotFound {
                entity: "extra",
                id: wanted.extra_id,
            })?;
        if extra.item_id != item.id {
            return Err(Error::validation(
                "extra_id",
                format!("extra {} does not belong to item {}", extra.id, item.id),
            ));
        }

        order_item_extra::ActiveModel {
            quantity: Set(wanted.quantity),
            order_item_id: Set(saved.id),
            extra_id: Set(extra.id),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }

    Ok(saved)
}

/// Validates `new_order` and stores it, with all lines, for `user_id`.
///
/// Flavors and extras must belong to the item of their line. Any failure
/// rolls the whole order back.
#[instrument(skip(db, new_order), fields(lines = new_order.ordered_items.len()))]
pub async fn create_order(
    db: &DatabaseConnection,
    user_id: i64,
    new_order: NewOrder,
) -> Result<order::Model> {
    new_order.validate()?;

    let created_at = new_order
        .created_at
        .unwrap_or_else(|| Local::now().naive_local());
    if new_order.closed_at.is_some_and(|closed| closed < created_at) {
        return Err(Error::validation("closed_at", "is before createdAt"));
    }

    let txn = db.begin().await?;

    User::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "user",
            id: user_id,
        })?;

    let created = order::ActiveModel {
        created_at: Set(created_at),
        closed_at: Set(new_order.closed_at),
        client_name: Set(new_order.client_name),
        table_number: Set(new_order.table_number),
        total: Set(new_order.total),
        user_id: Set(Some(user_id)),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for line in &new_order.ordered_items {
        let saved = insert_line(&txn, created.id, line).await?;
        debug!(order_item_id = saved.id, "Added order line");
    }

    txn.commit().await?;
    info!(order_id = created.id, "Created order");
    Ok(created)
}

fn order_not_found(order_id: i64) -> Error {
    Error::NotFound {
        entity: "order",
        id: order_id,
    }
}

/// Loads an order header without its lines.
pub async fn get_order(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| order_not_found(order_id))
}

/// Loads an order with every line, item, flavor and extra.
pub async fn get_order_with_items(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<OrderDetails> {
    let order = get_order(db, order_id).await?;

    let lines = order
        .find_related(OrderItem)
        .order_by_asc(order_item::Column::Id)
        .find_also_related(Item)
        .all(db)
        .await?;

    let mut ordered_items = Vec::with_capacity(lines.len());
    for (line, item) in lines {
        let item = item.ok_or(Error::NotFound {
            entity: "item",
            id: line.item_id,
        })?;
        let flavor = line.find_related(Flavor).one(db).await?;

        let extras = line
            .find_related(OrderItemExtra)
            .order_by_asc(order_item_extra::Column::Id)
            .find_also_related(Extra)
            .all(db)
            .await?
            .into_iter()
            .map(|(entry, extra)| {
                extra
                    .map(|extra| LineExtra {
                        entry: entry.clone(),
                        extra,
                    })
                    .ok_or(Error::NotFound {
                        entity: "extra",
                        id: entry.extra_id,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        ordered_items.push(OrderLine {
            line,
            item,
            flavor,
            extras,
        });
    }

    Ok(OrderDetails {
        order,
        ordered_items,
    })
}

/// Orders taken by one user, newest first.
pub async fn list_orders_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<order::Model>> {
    Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks an order as closed at `closed_at` (now when `None`).
#[instrument(skip(db))]
pub async fn close_order(
    db: &DatabaseConnection,
    order_id: i64,
    closed_at: Option<NaiveDateTime>,
) -> Result<order::Model> {
    let order = get_order(db, order_id).await?;

    let closed_at = closed_at.unwrap_or_else(|| Local::now().naive_local());
    if closed_at < order.created_at {
        return Err(Error::validation("closed_at", "is before createdAt"));
    }

    let mut active = order.into_active_model();
    active.closed_at = Set(Some(closed_at));
    let closed = active.update(db).await?;
    info!("Closed order");
    Ok(closed)
}

/// Moves one order line to `status`.
#[instrument(skip(db))]
pub async fn set_item_status(
    db: &DatabaseConnection,
    order_item_id: i64,
    status: OrderItemStatus,
) -> Result<order_item::Model> {
    let line = OrderItem::find_by_id(order_item_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "order_item",
            id: order_item_id,
        })?;

    let mut active = line.into_active_model();
    active.status = Set(status);
    active.update(db).await.map_err(Into::into)
}

/// Deletes an order with all its lines and line extras.
#[instrument(skip(db))]
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let result = Order::delete_by_id(order_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(order_not_found(order_id));
    }
    info!("Deleted order");
    Ok(())
}
