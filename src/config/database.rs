//! Database configuration module for order-now.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so column types, foreign keys and their
//! `ON DELETE` rules come straight from the entity relations.

use crate::entities::{
    Extra, Flavor, Group, Item, LoginAttempt, Order, OrderItem, OrderItemExtra, User,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityName, EntityTrait, Schema,
};
use tracing::{debug, info, instrument};

/// Establishes a connection pool to `database_url`.
///
/// The pool is created once at startup and handed to every operation.
#[instrument(skip(database_url))]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    info!(backend = ?db.get_database_backend(), "Database connection established");
    Ok(db)
}

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<()>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let builder = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    debug!(table = entity.table_name(), "Creating table if missing");
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables, parents before children.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, User).await?;
    create_table(db, &schema, LoginAttempt).await?;
    create_table(db, &schema, Group).await?;
    create_table(db, &schema, Item).await?;
    create_table(db, &schema, Flavor).await?;
    create_table(db, &schema, Extra).await?;
    create_table(db, &schema, Order).await?;
    create_table(db, &schema, OrderItem).await?;
    create_table(db, &schema, OrderItemExtra).await?;

    info!("Database tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{group, login_attempt, order_item_extra};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<group::Model> = Group::find().limit(1).all(&db).await?;
        let _: Vec<login_attempt::Model> = LoginAttempt::find().limit(1).all(&db).await?;
        let _: Vec<order_item_extra::Model> = OrderItemExtra::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = create_connection("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
