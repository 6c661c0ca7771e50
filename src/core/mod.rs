//! Framework-agnostic business logic.
//!
//! Everything here takes a SeaORM connection or transaction and returns
//! [`crate::errors::Result`]; nothing knows about HTTP.

/// Lockout rule, password validation and login
pub mod auth;
/// Groups, items, flavors and extras
pub mod catalog;
/// Orders, order lines and line extras
pub mod order;
/// Argon2id hashing policy
pub mod password;
/// Account creation, lookup and removal
pub mod user;
