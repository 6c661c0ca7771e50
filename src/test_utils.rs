//! Shared test utilities for order-now.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        auth::{Authenticator, LockoutPolicy},
        catalog, order,
        password::PasswordPolicy,
        user,
    },
    entities::{self, LoginAttempt, login_attempt},
    errors::Result,
    schemas::{NewGroup, NewItem, NewOrder, NewOrderItem, NewOrderItemExtra, NewUser, NewVariant},
};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Authenticator with the default lockout rule and the cheapest Argon2 costs,
/// so tests do not spend seconds hashing.
#[allow(clippy::expect_used)]
pub fn test_authenticator() -> Authenticator {
    Authenticator::new(
        PasswordPolicy::new(64, 1, 1).expect("valid argon2 parameters"),
        LockoutPolicy::default(),
    )
}

/// Creates a test user named `name` with email `<name>@example.com`.
///
/// # Defaults
/// * `access_level`: employee
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
    password: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        &test_authenticator(),
        NewUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password: password.to_string(),
            access_level: entities::AccessLevel::default(),
        },
    )
    .await
}

/// Counts every stored login attempt of `user_id`, whatever the day.
pub async fn count_attempts(db: &DatabaseConnection, user_id: i64) -> Result<u64> {
    LoginAttempt::find()
        .filter(login_attempt::Column::UserId.eq(user_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// A group holding one item with one flavor and one extra.
pub struct TestCatalog {
    pub group: entities::group::Model,
    pub item: entities::item::Model,
    pub flavor: entities::flavor::Model,
    pub extra: entities::extra::Model,
}

/// Creates "Pizzas" > "Margherita" (10.00) with a "Large" flavor (2.50) and
/// an "Extra cheese" extra (1.25).
pub async fn create_test_catalog(db: &DatabaseConnection) -> Result<TestCatalog> {
    let group = catalog::create_group(
        db,
        NewGroup {
            description: "Pizzas".to_string(),
        },
    )
    .await?;
    let item = catalog::create_item(
        db,
        NewItem {
            name: "Margherita".to_string(),
            description: "Tomato, mozzarella, basil".to_string(),
            price: Decimal::new(1000, 2),
            group_id: Some(group.id),
        },
    )
    .await?;
    let flavor = catalog::add_flavor(
        db,
        item.id,
        NewVariant {
            description: "Large".to_string(),
            price: Decimal::new(250, 2),
        },
    )
    .await?;
    let extra = catalog::add_extra(
        db,
        item.id,
        NewVariant {
            description: "Extra cheese".to_string(),
            price: Decimal::new(125, 2),
        },
    )
    .await?;

    Ok(TestCatalog {
        group,
        item,
        flavor,
        extra,
    })
}

/// Order payload with one line of two large margheritas and one extra cheese.
pub fn test_order_payload(catalog: &TestCatalog) -> NewOrder {
    NewOrder {
        client_name: Some("Bob".to_string()),
        table_number: Some(4),
        total: Decimal::new(2625, 2),
        ordered_items: vec![NewOrderItem {
            quantity: 2,
            status: entities::OrderItemStatus::default(),
            item_id: catalog.item.id,
            flavor_id: Some(catalog.flavor.id),
            extras: vec![NewOrderItemExtra {
                quantity: 1,
                extra_id: catalog.extra.id,
            }],
        }],
        ..NewOrder::default()
    }
}

/// Creates the order from [`test_order_payload`] for `user_id`.
pub async fn create_test_order(
    db: &DatabaseConnection,
    user_id: i64,
    catalog: &TestCatalog,
) -> Result<entities::order::Model> {
    order::create_order(db, user_id, test_order_payload(catalog)).await
}
