//! Authentication business logic - password checks and brute-force lockout.
//!
//! A failed check appends a `login_attempt` row, and once a user collects more
//! than [`LockoutPolicy::max_daily_failures`] failures within one server-local
//! calendar day the account is blocked. A successful check upgrades hashes
//! produced under an older [`PasswordPolicy`].
//!
//! Both side effects are written through the caller's transaction, so a
//! rollback leaves the account exactly as it was before the check.

use crate::{
    core::password::PasswordPolicy,
    entities::{LoginAttempt, User, login_attempt, user},
    errors::{Error, Result},
};
use chrono::{Local, NaiveDateTime, NaiveTime};
use sea_orm::{
    ActiveValue, DatabaseConnection, DatabaseTransaction, IntoActiveModel, PaginatorTrait, Set,
    TransactionTrait, TryIntoModel, prelude::*,
};
use std::net::IpAddr;
use tracing::{debug, info, instrument, warn};

/// Daily failed-login threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// The account is blocked once today's failures exceed this number
    pub max_daily_failures: u64,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_daily_failures: 3,
        }
    }
}

/// Result of a full login through [`Authenticator::authenticate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials matched; carries the (possibly rehashed) user
    Granted(user::Model),
    /// Unknown email or wrong password
    Rejected,
    /// The account was already blocked; the password was not checked
    Blocked,
}

/// Applies the hashing and lockout policies to user accounts.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    passwords: PasswordPolicy,
    lockout: LockoutPolicy,
}

/// Server-local `[midnight, next midnight)` containing `now`.
fn day_bounds(now: NaiveDateTime) -> (NaiveDateTime, Option<NaiveDateTime>) {
    let today = now.date();
    let start = today.and_time(NaiveTime::MIN);
    let end = today.succ_opt().map(|d| d.and_time(NaiveTime::MIN));
    (start, end)
}

fn persisted_id(user: &user::ActiveModel) -> Result<i64> {
    match &user.id {
        ActiveValue::Set(id) | ActiveValue::Unchanged(id) => Ok(*id),
        ActiveValue::NotSet => Err(Error::OutOfUnitOfWork { entity: "user" }),
    }
}

fn stored_hash(user: &user::ActiveModel) -> Result<String> {
    match &user.password {
        ActiveValue::Set(hash) | ActiveValue::Unchanged(hash) => Ok(hash.clone()),
        ActiveValue::NotSet => Err(Error::PasswordHash {
            message: "user has no password set".to_string(),
        }),
    }
}

fn is_blocked(user: &user::ActiveModel) -> bool {
    matches!(
        user.blocked,
        ActiveValue::Set(true) | ActiveValue::Unchanged(true)
    )
}

/// Writes pending changes on `user` and reloads it from the saved row.
async fn flush(txn: &DatabaseTransaction, user: &mut user::ActiveModel) -> Result<()> {
    if user.is_changed() {
        let saved = user.clone().update(txn).await?;
        *user = saved.into_active_model();
    }
    Ok(())
}

impl Authenticator {
    /// Creates an authenticator with explicit policies.
    #[must_use]
    pub const fn new(passwords: PasswordPolicy, lockout: LockoutPolicy) -> Self {
        Self {
            passwords,
            lockout,
        }
    }

    /// Hashing policy in force
    #[must_use]
    pub const fn passwords(&self) -> &PasswordPolicy {
        &self.passwords
    }

    /// Lockout policy in force
    #[must_use]
    pub const fn lockout(&self) -> LockoutPolicy {
        self.lockout
    }

    /// Stores a fresh hash of `plaintext` on `user`. Nothing is written to the
    /// database until the active model is saved.
    ///
    /// # Errors
    /// Rejects an empty `plaintext`.
    pub fn set_password(&self, user: &mut user::ActiveModel, plaintext: &str) -> Result<()> {
        if plaintext.is_empty() {
            return Err(Error::validation("password", "Password cannot be empty"));
        }
        user.password = Set(self.passwords.hash(plaintext)?);
        Ok(())
    }

    /// Counts `user`'s failed attempts during the current server-local day.
    ///
    /// # Errors
    /// `OutOfUnitOfWork` when `user` has never been persisted.
    pub async fn login_attempts_today<C>(&self, db: &C, user: &user::ActiveModel) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let user_id = persisted_id(user)?;
        let (start, end) = day_bounds(Local::now().naive_local());

        let mut query = LoginAttempt::find()
            .filter(login_attempt::Column::UserId.eq(user_id))
            .filter(login_attempt::Column::Date.gte(start));
        if let Some(end) = end {
            query = query.filter(login_attempt::Column::Date.lt(end));
        }

        query.count(db).await.map_err(Into::into)
    }

    /// Checks `candidate` against `user`'s stored hash inside `txn`.
    ///
    /// A wrong password records a login attempt from `ip` and may block the
    /// account; a right one may rehash the stored password. Any change is
    /// flushed through `txn` and `user` is refreshed from the saved row. The
    /// caller commits.
    ///
    /// # Errors
    /// Never for a wrong password. Database failures, a detached `user` or a
    /// malformed stored hash are errors.
    #[instrument(skip(self, txn, user, candidate), fields(user_id))]
    pub async fn validate_password(
        &self,
        txn: &DatabaseTransaction,
        user: &mut user::ActiveModel,
        candidate: &str,
        ip: IpAddr,
    ) -> Result<bool> {
        let user_id = persisted_id(user)?;
        tracing::Span::current().record("user_id", user_id);
        let stored = stored_hash(user)?;

        if !self.passwords.verify(candidate, &stored)? {
            login_attempt::ActiveModel {
                date: Set(Local::now().naive_local()),
                ip: Set(ip.to_string()),
                user_id: Set(user_id),
                ..Default::default()
            }
            .insert(txn)
            .await?;

            let failures = self.login_attempts_today(txn, user).await?;
            debug!(failures, "Recorded failed login attempt");

            if failures > self.lockout.max_daily_failures && !is_blocked(user) {
                warn!(
                    failures,
                    threshold = self.lockout.max_daily_failures,
                    "Blocking account after repeated failed logins"
                );
                user.blocked = Set(true);
            }

            flush(txn, user).await?;
            return Ok(false);
        }

        if self.passwords.needs_rehash(&stored)? {
            info!("Upgrading password hash to current policy");
            user.password = Set(self.passwords.hash(candidate)?);
        }

        flush(txn, user).await?;
        Ok(true)
    }

    /// Full login as one unit of work: look up by email, refuse blocked
    /// accounts, validate, commit.
    ///
    /// Unknown emails and blocked accounts record no attempt.
    #[instrument(skip(self, db, candidate))]
    pub async fn authenticate(
        &self,
        db: &DatabaseConnection,
        email: &str,
        candidate: &str,
        ip: IpAddr,
    ) -> Result<LoginOutcome> {
        let txn = db.begin().await?;

        let Some(found) = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&txn)
            .await?
        else {
            debug!("Login for unknown email");
            return Ok(LoginOutcome::Rejected);
        };

        if found.blocked {
            info!(user_id = found.id, "Login refused for blocked account");
            return Ok(LoginOutcome::Blocked);
        }

        let mut active = found.into_active_model();
        let granted = self.validate_password(&txn, &mut active, candidate, ip).await?;
        txn.commit().await?;

        if granted {
            Ok(LoginOutcome::Granted(active.try_into_model()?))
        } else {
            Ok(LoginOutcome::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::{Duration, NaiveDate};
    use std::net::Ipv4Addr;

    const IP: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7));

    async fn fail_once(
        db: &DatabaseConnection,
        auth: &Authenticator,
        user: &mut user::ActiveModel,
    ) -> Result<bool> {
        let txn = db.begin().await?;
        let ok = auth.validate_password(&txn, user, "wrong", IP).await?;
        txn.commit().await?;
        Ok(ok)
    }

    #[test]
    fn test_day_bounds() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(17, 45, 3)
            .unwrap();
        let (start, end) = day_bounds(now);
        assert_eq!(start.to_string(), "2024-03-09 00:00:00");
        assert_eq!(end.unwrap().to_string(), "2024-03-10 00:00:00");
    }

    #[test]
    fn test_set_password_hashes_and_rejects_empty() {
        let auth = test_authenticator();
        let mut user = <user::ActiveModel as Default>::default();

        auth.set_password(&mut user, "secret123").unwrap();
        let stored = stored_hash(&user).unwrap();
        assert_ne!(stored, "secret123");
        assert!(auth.passwords().verify("secret123", &stored).unwrap());

        let err = auth.set_password(&mut user, "").unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "password"));
    }

    #[tokio::test]
    async fn test_validate_password_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = test_authenticator();
        let mut alice = create_test_user(&db, "Alice", "secret123").await?.into_active_model();

        let txn = db.begin().await?;
        assert!(auth.validate_password(&txn, &mut alice, "secret123", IP).await?);
        assert!(!auth.validate_password(&txn, &mut alice, "secret124", IP).await?);
        txn.commit().await?;

        assert_eq!(count_attempts(&db, persisted_id(&alice)?).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_three_failures_do_not_block() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = test_authenticator();
        let mut alice = create_test_user(&db, "Alice", "secret123").await?.into_active_model();

        for _ in 0..3 {
            assert!(!fail_once(&db, &auth, &mut alice).await?);
        }

        let stored = User::find_by_id(persisted_id(&alice)?).one(&db).await?.unwrap();
        assert!(!stored.blocked);
        assert_eq!(auth.login_attempts_today(&db, &alice).await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_fourth_failure_blocks_account() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = test_authenticator();
        let mut alice = create_test_user(&db, "Alice", "secret123").await?.into_active_model();

        for _ in 0..4 {
            assert!(!fail_once(&db, &auth, &mut alice).await?);
        }

        let stored = User::find_by_id(persisted_id(&alice)?).one(&db).await?.unwrap();
        assert!(stored.blocked);

        let attempts = LoginAttempt::find()
            .filter(login_attempt::Column::UserId.eq(stored.id))
            .all(&db)
            .await?;
        assert_eq!(attempts.len(), 4);
        let today = Local::now().date_naive();
        assert!(attempts.iter().all(|a| a.date.date() == today));
        assert!(attempts.iter().all(|a| a.ip == "10.0.0.7"));
        Ok(())
    }

    #[tokio::test]
    async fn test_previous_day_failures_do_not_count() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = test_authenticator();
        let alice = create_test_user(&db, "Alice", "secret123").await?;

        let yesterday = Local::now().naive_local() - Duration::days(1);
        for _ in 0..5 {
            login_attempt::ActiveModel {
                date: Set(yesterday),
                ip: Set("10.0.0.1".to_string()),
                user_id: Set(alice.id),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        let mut alice = alice.into_active_model();
        assert!(!fail_once(&db, &auth, &mut alice).await?);

        assert_eq!(auth.login_attempts_today(&db, &alice).await?, 1);
        assert!(!is_blocked(&alice));
        Ok(())
    }

    #[tokio::test]
    async fn test_rollback_leaves_account_untouched() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = test_authenticator();
        let alice = create_test_user(&db, "Alice", "secret123").await?;
        let mut active = alice.clone().into_active_model();

        let txn = db.begin().await?;
        for _ in 0..4 {
            auth.validate_password(&txn, &mut active, "wrong", IP).await?;
        }
        assert!(is_blocked(&active));
        txn.rollback().await?;

        let stored = User::find_by_id(alice.id).one(&db).await?.unwrap();
        assert!(!stored.blocked);
        assert_eq!(count_attempts(&db, alice.id).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_successful_login_rehashes_outdated_hash() -> Result<()> {
        let db = setup_test_db().await?;
        let old = test_authenticator();
        let alice = create_test_user(&db, "Alice", "secret123").await?;

        let current = Authenticator::new(
            PasswordPolicy::new(128, 2, 1)?,
            LockoutPolicy::default(),
        );
        assert!(current.passwords().needs_rehash(&alice.password)?);

        let mut active = alice.clone().into_active_model();
        let txn = db.begin().await?;
        assert!(current.validate_password(&txn, &mut active, "secret123", IP).await?);
        txn.commit().await?;

        let stored = User::find_by_id(alice.id).one(&db).await?.unwrap();
        assert_ne!(stored.password, alice.password);
        assert!(!current.passwords().needs_rehash(&stored.password)?);
        assert!(old.passwords().verify("secret123", &stored.password)?);
        Ok(())
    }

    #[tokio::test]
    async fn test_detached_user_is_out_of_unit_of_work() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = test_authenticator();
        let mut detached = <user::ActiveModel as Default>::default();
        auth.set_password(&mut detached, "secret123")?;

        let err = auth.login_attempts_today(&db, &detached).await.unwrap_err();
        assert!(matches!(err, Error::OutOfUnitOfWork { entity: "user" }));

        let txn = db.begin().await?;
        let err = auth
            .validate_password(&txn, &mut detached, "secret123", IP)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OutOfUnitOfWork { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_authenticate_scenarios() -> Result<()> {
        let db = setup_test_db().await?;
        let auth = test_authenticator();
        let alice = create_test_user(&db, "Alice", "secret123").await?;

        let outcome = auth.authenticate(&db, &alice.email, "secret123", IP).await?;
        assert_eq!(outcome, LoginOutcome::Granted(alice.clone()));

        let outcome = auth.authenticate(&db, "nobody@example.com", "secret123", IP).await?;
        assert_eq!(outcome, LoginOutcome::Rejected);

        for _ in 0..4 {
            let outcome = auth.authenticate(&db, &alice.email, "wrong", IP).await?;
            assert_eq!(outcome, LoginOutcome::Rejected);
        }

        // Blocked accounts are refused even with the right password
        let outcome = auth.authenticate(&db, &alice.email, "secret123", IP).await?;
        assert_eq!(outcome, LoginOutcome::Blocked);
        assert_eq!(count_attempts(&db, alice.id).await?, 4);
        Ok(())
    }
}
