use async_trait::async_trait;
use database::UnitOfWork;

use crate::error::UserResult;
use crate::models::User;

/// Repository trait for User persistence
///
/// Every method takes the unit of work to run in: `Some` executes on that
/// transaction, `None` on a pooled connection outside any transaction.
/// Soft-deleted rows are never returned or updated.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with its row id.
    async fn create(&self, uow: Option<&UnitOfWork>, user: User) -> UserResult<User>;

    /// Persist the mutable fields of an existing user matched by row id.
    ///
    /// Refreshes `updated_at`. A missing or soft-deleted row is a storage error.
    async fn update(&self, uow: Option<&UnitOfWork>, user: User) -> UserResult<User>;

    /// Look up by public user id; `UserError::NotFound` when absent.
    async fn get_by_id(&self, uow: Option<&UnitOfWork>, user_id: &str) -> UserResult<User>;

    /// Look up by email; `Ok(None)` when no user matches.
    async fn get_by_email(&self, uow: Option<&UnitOfWork>, email: &str)
    -> UserResult<Option<User>>;
}
