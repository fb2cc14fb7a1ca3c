//! Unit-of-work transaction coordination.
//!
//! A [`UnitOfWork`] is an open transaction handed explicitly to every
//! repository call that should take part in it. Repositories accept
//! `Option<&UnitOfWork>` and fall back to the pooled connection on `None`.
//!
//! ```ignore
//! let manager = TransactionManager::new(db.clone());
//! let user = manager
//!     .run_in_transaction(move |uow| {
//!         Box::pin(async move { repo.create(Some(uow), new_user).await })
//!     })
//!     .await?;
//! ```
//!
//! Calling `run_in_transaction` from inside another unit of work opens a
//! second, independent transaction; there is no savepoint nesting.

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Future returned by a unit-of-work callback, borrowing the handle for `'u`.
pub type WorkFuture<'u, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'u>>;

/// An open database transaction.
///
/// Only [`TransactionManager`] creates one. Dropping it without a commit
/// rolls the transaction back, which covers panics and cancelled futures.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    /// The transaction to execute statements on.
    pub fn connection(&self) -> &DatabaseTransaction {
        &self.txn
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork").finish_non_exhaustive()
    }
}

/// Opens units of work on a pooled connection.
#[derive(Clone, Debug)]
pub struct TransactionManager {
    db: DatabaseConnection,
}

impl TransactionManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The pooled connection, for statements outside any unit of work.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Run `work` inside a fresh transaction.
    ///
    /// Commits when `work` returns `Ok`. Rolls back when it returns `Err` and
    /// hands that same error back; a failure of the rollback itself is only
    /// logged. Failing to begin or commit surfaces as `E::from(DbErr)`.
    pub async fn run_in_transaction<F, T, E>(&self, work: F) -> Result<T, E>
    where
        F: for<'u> FnOnce(&'u UnitOfWork) -> WorkFuture<'u, T, E> + Send,
        T: Send,
        E: From<DbErr> + Send,
    {
        let uow = UnitOfWork {
            txn: self.db.begin().await?,
        };
        debug!("Transaction started");

        let outcome = work(&uow).await;

        match outcome {
            Ok(value) => {
                uow.txn.commit().await?;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => {
                match uow.txn.rollback().await {
                    Ok(()) => debug!("Transaction rolled back"),
                    Err(rollback_err) => {
                        warn!(error = %rollback_err, "Transaction rollback failed");
                    }
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{connect, DatabaseConfig};
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    #[derive(Debug, PartialEq)]
    enum TestError {
        Db(String),
        Aborted,
    }

    impl From<DbErr> for TestError {
        fn from(e: DbErr) -> Self {
            TestError::Db(e.to_string())
        }
    }

    async fn setup() -> TransactionManager {
        let config = DatabaseConfig::new("sqlite::memory:")
            .unwrap()
            .with_pool_size(1, 1);
        let db = connect(config).await.unwrap();
        db.execute_unprepared("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT NOT NULL)")
            .await
            .unwrap();
        TransactionManager::new(db)
    }

    async fn count_notes(db: &DatabaseConnection) -> i64 {
        let row = db
            .query_one_raw(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT COUNT(*) AS n FROM notes".to_owned(),
            ))
            .await
            .unwrap()
            .unwrap();
        row.try_get("", "n").unwrap()
    }

    async fn insert_note<C: ConnectionTrait>(conn: &C, id: i32) -> Result<(), DbErr> {
        conn.execute_unprepared(&format!("INSERT INTO notes (id, body) VALUES ({id}, 'n{id}')"))
            .await
            .map(|_| ())
    }

    #[tokio::test]
    async fn test_commit_persists_writes() {
        let manager = setup().await;

        let result: Result<i32, TestError> = manager
            .run_in_transaction(|uow| {
                Box::pin(async move {
                    insert_note(uow.connection(), 1).await?;
                    insert_note(uow.connection(), 2).await?;
                    Ok(2)
                })
            })
            .await;

        assert_eq!(result, Ok(2));
        assert_eq!(count_notes(manager.connection()).await, 2);
    }

    #[tokio::test]
    async fn test_error_rolls_back_and_is_returned_unchanged() {
        let manager = setup().await;

        let result: Result<(), TestError> = manager
            .run_in_transaction(|uow| {
                Box::pin(async move {
                    insert_note(uow.connection(), 1).await?;
                    Err(TestError::Aborted)
                })
            })
            .await;

        assert_eq!(result, Err(TestError::Aborted));
        assert_eq!(count_notes(manager.connection()).await, 0);
    }

    #[tokio::test]
    async fn test_statement_failure_rolls_back_earlier_writes() {
        let manager = setup().await;

        let result: Result<(), TestError> = manager
            .run_in_transaction(|uow| {
                Box::pin(async move {
                    insert_note(uow.connection(), 7).await?;
                    // duplicate primary key
                    insert_note(uow.connection(), 7).await?;
                    Ok(())
                })
            })
            .await;

        assert!(matches!(result, Err(TestError::Db(_))));
        assert_eq!(count_notes(manager.connection()).await, 0);
    }

    #[tokio::test]
    async fn test_sequential_units_are_independent() {
        let manager = setup().await;

        let first: Result<(), TestError> = manager
            .run_in_transaction(|uow| Box::pin(async move { Ok(insert_note(uow.connection(), 1).await?) }))
            .await;
        let second: Result<(), TestError> = manager
            .run_in_transaction(|uow| {
                Box::pin(async move {
                    insert_note(uow.connection(), 2).await?;
                    Err(TestError::Aborted)
                })
            })
            .await;

        assert!(first.is_ok());
        assert!(second.is_err());
        assert_eq!(count_notes(manager.connection()).await, 1);
    }

    #[tokio::test]
    async fn test_cancelled_unit_of_work_rolls_back() {
        let manager = setup().await;

        let run = manager.run_in_transaction(|uow| {
            Box::pin(async move {
                insert_note(uow.connection(), 1).await?;
                std::future::pending::<()>().await;
                Ok::<_, TestError>(())
            })
        });
        let cancelled = tokio::time::timeout(std::time::Duration::from_millis(100), run).await;

        assert!(cancelled.is_err());
        assert_eq!(count_notes(manager.connection()).await, 0);
    }
}
