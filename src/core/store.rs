//! Serializable transaction harness.
//!
//! Every multi-step business operation runs through [`serializable`]: one
//! transaction per attempt, committed when the work succeeds and rolled back on
//! every failure path. Attempts that lose a store-level conflict are retried
//! from scratch under the configured [`RetryPolicy`]; since each attempt uses a
//! fresh transaction, nothing from a failed attempt survives into the next.

use crate::config::booking::RetryPolicy;
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, IsolationLevel,
    TransactionTrait,
};
use std::future::Future;
use tracing::{debug, warn};

/// Opens a transaction at serializable isolation.
///
/// `SQLite` transactions are always serializable and reject per-transaction
/// isolation settings, so the level is only requested on other backends.
pub async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction> {
    let isolation =
        (db.get_database_backend() != DbBackend::Sqlite).then_some(IsolationLevel::Serializable);
    db.begin_with_config(isolation, None)
        .await
        .map_err(Into::into)
}

/// Commits on success, rolls back on failure, and hands the outcome back.
pub async fn finish<T>(txn: DatabaseTransaction, outcome: Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            txn.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!("Rollback failed after {err}: {rollback_err}");
            }
            Err(err)
        }
    }
}

/// Runs `work` inside a serializable transaction, retrying store conflicts.
///
/// `work` receives the transaction by value and must return it alongside its
/// result so the harness can commit or roll it back.
pub async fn serializable<T, F, Fut>(
    db: &DatabaseConnection,
    policy: RetryPolicy,
    operation: &str,
    mut work: F,
) -> Result<T>
where
    F: FnMut(DatabaseTransaction) -> Fut,
    Fut: Future<Output = (DatabaseTransaction, Result<T>)>,
{
    let mut attempt = 1;
    loop {
        let outcome = match begin(db).await {
            Ok(txn) => {
                let (txn, result) = work(txn).await;
                finish(txn, result).await
            }
            Err(err) => Err(err),
        };

        match outcome {
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(operation, attempt, ?delay, "Transaction conflict, retrying: {err}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => {
                debug!(operation, attempt, ok = other.is_ok(), "Transaction finished");
                return other;
            }
        }
    }
}
