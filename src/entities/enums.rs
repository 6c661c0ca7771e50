//! Enumerated column types.
//!
//! Both enums are stored as their lowercase name and serialize the same way,
//! so the database and the wire agree on `"preparing"`, `"admin"`, and so on.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a user is allowed to do in the point of sale
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// Full control, including user management
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Catalog and order management
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Takes and serves orders
    #[default]
    #[sea_orm(string_value = "employee")]
    Employee,
}

/// Kitchen progress of a single order line
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum OrderItemStatus {
    /// Accepted, not ready yet
    #[default]
    #[sea_orm(string_value = "preparing")]
    Preparing,
    /// Ready to be served
    #[sea_orm(string_value = "done")]
    Done,
    /// Delivered to the client
    #[sea_orm(string_value = "served")]
    Served,
}
