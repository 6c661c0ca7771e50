//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.
//!
//! Table names follow [`crate::naming::snake_case`] of the entity type name,
//! JSON keys follow [`crate::naming::camel_case`] of the field name.

pub mod enums;
pub mod extra;
pub mod flavor;
pub mod group;
pub mod item;
pub mod login_attempt;
pub mod order;
pub mod order_item;
pub mod order_item_extra;
pub mod user;

pub use enums::{AccessLevel, OrderItemStatus};

// Re-export specific types to avoid conflicts
pub use extra::{Column as ExtraColumn, Entity as Extra, Model as ExtraModel};
pub use flavor::{Column as FlavorColumn, Entity as Flavor, Model as FlavorModel};
pub use group::{Column as GroupColumn, Entity as Group, Model as GroupModel};
pub use item::{Column as ItemColumn, Entity as Item, Model as ItemModel};
pub use login_attempt::{
    Column as LoginAttemptColumn, Entity as LoginAttempt, Model as LoginAttemptModel,
};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use order_item_extra::{
    Column as OrderItemExtraColumn, Entity as OrderItemExtra, Model as OrderItemExtraModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::naming::{camel_case, snake_case};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sea_orm::{EntityName, IdenStatic, Iterable};

    #[test]
    fn test_table_names_follow_type_names() {
        let tables = [
            ("User", User.table_name()),
            ("LoginAttempt", LoginAttempt.table_name()),
            ("Group", Group.table_name()),
            ("Item", Item.table_name()),
            ("Flavor", Flavor.table_name()),
            ("Extra", Extra.table_name()),
            ("Order", Order.table_name()),
            ("OrderItem", OrderItem.table_name()),
            ("OrderItemExtra", OrderItemExtra.table_name()),
        ];
        for (type_name, table) in tables {
            assert_eq!(snake_case(type_name), table);
        }
    }

    #[test]
    fn test_order_serializes_camel_case_keys() {
        let created_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let order = OrderModel {
            id: 1,
            created_at,
            closed_at: None,
            client_name: Some("Bob".to_string()),
            table_number: Some(4),
            total: Decimal::new(1250, 2),
            user_id: Some(7),
        };
        let json = serde_json::to_value(&order).unwrap();
        let object = json.as_object().unwrap();

        for column in order::Column::iter() {
            let internal = column.as_str();
            assert!(
                object.contains_key(&camel_case(internal)),
                "missing key for {internal}"
            );
        }
        assert_eq!(serde_json::to_string(&object["total"]).unwrap(), "12.50");
    }

    #[test]
    fn test_user_password_never_serialized() {
        let user = UserModel {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "$argon2id$v=19$m=8,t=1,p=1$c2FsdA$ZGlnZXN0".to_string(),
            access_level: AccessLevel::Manager,
            blocked: false,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["accessLevel"], "manager");
    }
}
