//! User business logic - account creation, lookup and removal.
//!
//! Deleting a user takes its login attempts with it; orders it took stay and
//! lose the reference.

use crate::{
    core::auth::Authenticator,
    entities::{LoginAttempt, User, login_attempt, user},
    errors::{Error, Result},
    schemas::{NewUser, Validate},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

/// Validates `new_user`, hashes its password and inserts it.
#[instrument(skip(db, auth))]
pub async fn create_user<C>(db: &C, auth: &Authenticator, new_user: NewUser) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    new_user.validate()?;

    let mut active = user::ActiveModel {
        name: Set(new_user.name.trim().to_string()),
        email: Set(new_user.email.trim().to_string()),
        access_level: Set(new_user.access_level),
        blocked: Set(false),
        ..Default::default()
    };
    auth.set_password(&mut active, &new_user.password)?;

    let created = active.insert(db).await?;
    info!(user_id = created.id, "Created user");
    Ok(created)
}

/// Loads a user by primary key.
pub async fn get_user_by_id<C>(db: &C, user_id: i64) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "user",
            id: user_id,
        })
}

/// Finds a user by login email. An unknown email is `None`, not an error.
pub async fn get_user_by_email<C>(db: &C, email: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All users, alphabetically.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Failed login history of one user, newest first.
pub async fn get_login_attempts(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<login_attempt::Model>> {
    LoginAttempt::find()
        .filter(login_attempt::Column::UserId.eq(user_id))
        .order_by_desc(login_attempt::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a user and its login attempts; its orders are kept.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: i64) -> Result<()> {
    let result = User::delete_by_id(user_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound {
            entity: "user",
            id: user_id,
        });
    }
    info!("Deleted user");
    Ok(())
}
