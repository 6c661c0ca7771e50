//! Inbound payloads - validated before anything touches the database.
//!
//! Every payload uses lowerCamelCase keys on the wire and implements
//! [`Validate`]. [`from_json`] parses and validates in one step, so a payload
//! that reaches the core functions has already passed its range checks.

use crate::{
    entities::{AccessLevel, OrderItemStatus},
    errors::{Error, Result},
    money::{self, validate_amount},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;

/// Type, shape and range checks for an inbound payload.
pub trait Validate {
    /// Returns the first rule the payload breaks, as [`Error::Validation`].
    fn validate(&self) -> Result<()>;
}

/// Parses a JSON body and validates it.
pub fn from_json<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let payload: T = serde_json::from_slice(bytes)?;
    payload.validate()?;
    Ok(payload)
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(())
}

fn require_positive(field: &str, value: i32) -> Result<()> {
    if value < 1 {
        return Err(Error::validation(field, format!("must be at least 1, got {value}")));
    }
    Ok(())
}

/// New account
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Plaintext, hashed on insert
    pub password: String,
    #[serde(default)]
    pub access_level: AccessLevel,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("access_level", &self.access_level)
            .finish()
    }
}

impl Validate for NewUser {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(Error::validation("email", "must be an email address"));
        }
        if self.password.is_empty() {
            return Err(Error::validation("password", "cannot be empty"));
        }
        Ok(())
    }
}

/// New menu group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub description: String,
}

impl Validate for NewGroup {
    fn validate(&self) -> Result<()> {
        require_text("description", &self.description)
    }
}

/// New catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    pub description: String,
    #[serde(with = "money::two_places", default)]
    pub price: Decimal,
    #[serde(default)]
    pub group_id: Option<i64>,
}

impl Validate for NewItem {
    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        validate_amount("price", self.price)
    }
}

/// New flavor or extra of an item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVariant {
    pub description: String,
    #[serde(with = "money::two_places", default)]
    pub price: Decimal,
}

impl Validate for NewVariant {
    fn validate(&self) -> Result<()> {
        require_text("description", &self.description)?;
        validate_amount("price", self.price)
    }
}

/// New order with its lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Defaults to now
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub closed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub table_number: Option<i32>,
    #[serde(with = "money::two_places", default)]
    pub total: Decimal,
    #[serde(default)]
    pub ordered_items: Vec<NewOrderItem>,
}

impl Validate for NewOrder {
    fn validate(&self) -> Result<()> {
        validate_amount("total", self.total)?;

        if let Some(table) = self.table_number.filter(|table| *table < 0) {
            return Err(Error::validation(
                "table_number",
                format!("must not be negative, got {table}"),
            ));
        }

        if let (Some(created), Some(closed)) = (self.created_at, self.closed_at) {
            if closed < created {
                return Err(Error::validation("closed_at", "is before createdAt"));
            }
        }

        self.ordered_items.iter().try_for_each(Validate::validate)
    }
}

/// One line of a new order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub quantity: i32,
    #[serde(default)]
    pub status: OrderItemStatus,
    pub item_id: i64,
    #[serde(default)]
    pub flavor_id: Option<i64>,
    #[serde(default)]
    pub extras: Vec<NewOrderItemExtra>,
}

impl Validate for NewOrderItem {
    fn validate(&self) -> Result<()> {
        require_positive("quantity", self.quantity)?;
        self.extras.iter().try_for_each(Validate::validate)
    }
}

/// One extra on a new order line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItemExtra {
    pub quantity: i32,
    pub extra_id: i64,
}

impl Validate for NewOrderItemExtra {
    fn validate(&self) -> Result<()> {
        require_positive("quantity", self.quantity)
    }
}
