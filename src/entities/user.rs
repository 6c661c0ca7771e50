//! User entity - An employee account of the point of sale.
//!
//! The password column only ever holds an Argon2 encoded hash and is never
//! serialized outward. Login attempts live and die with the user; orders
//! outlive it.

use super::enums::AccessLevel;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login identifier
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Permission tier, `employee` unless stated otherwise
    pub access_level: AccessLevel,
    /// Set after too many failed logins in one day; never cleared here
    pub blocked: bool,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many failed login attempts
    #[sea_orm(has_many = "super::login_attempt::Entity")]
    LoginAttempts,
    /// One user has taken many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::login_attempt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LoginAttempts.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
