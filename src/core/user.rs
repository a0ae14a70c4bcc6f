//! Customer accounts - sign-up, login and balance updates.

use crate::{
    config::booking::RetryPolicy,
    core::{session::Session, store},
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set, SqlErr};
use tracing::{info, instrument};

/// Finds a user by username.
pub async fn get_user<C>(db: &C, username: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(username.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Overwrites a user's balance.
pub async fn update_balance<C>(db: &C, username: &str, new_balance: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let account = user::ActiveModel {
        username: Set(username.to_string()),
        balance: Set(new_balance),
        ..Default::default()
    };
    account.update(db).await?;
    Ok(())
}

/// Creates a customer account with an initial balance.
///
/// The existence check and the insert run in one serializable transaction. A
/// concurrent sign-up that slips past the check still trips the primary key and
/// is reported the same way.
#[instrument(skip(db, password))]
pub async fn create_customer(
    db: &DatabaseConnection,
    policy: RetryPolicy,
    username: &str,
    password: &str,
    initial_amount: i64,
) -> Result<user::Model> {
    if initial_amount < 0 {
        return Err(Error::InvalidAmount {
            amount: initial_amount,
        });
    }

    let created = store::serializable(db, policy, "create_customer", move |txn| async move {
        let result = insert_user(&txn, username, password, initial_amount).await;
        (txn, result)
    })
    .await?;

    info!("Created user {username}");
    Ok(created)
}

async fn insert_user<C>(
    db: &C,
    username: &str,
    password: &str,
    balance: i64,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    if get_user(db, username).await?.is_some() {
        return Err(Error::DuplicateUser {
            username: username.to_string(),
        });
    }

    let account = user::ActiveModel {
        username: Set(username.to_string()),
        password: Set(password.to_string()),
        balance: Set(balance),
    };
    account.insert(db).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::DuplicateUser {
            username: username.to_string(),
        },
        _ => Error::Database(err),
    })
}

/// Logs the session in when the password matches.
///
/// Unknown users and wrong passwords both yield [`Error::AuthFailed`], so the
/// caller cannot tell whether the username exists.
#[instrument(skip(db, session, password))]
pub async fn login(
    db: &DatabaseConnection,
    session: &mut Session,
    username: &str,
    password: &str,
) -> Result<()> {
    if session.username().is_some() {
        return Err(Error::AlreadyLoggedIn);
    }

    let account = get_user(db, username).await?;
    match account {
        Some(account) if account.password == password => {
            session.log_in(account.username)?;
            info!("User logged in");
            Ok(())
        }
        _ => Err(Error::AuthFailed),
    }
}
