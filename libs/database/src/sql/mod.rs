//! Relational store access through SeaORM
//!
//! Connection management, migration running, health probes and the
//! unit-of-work transaction coordinator. One code path serves Postgres,
//! MySQL and SQLite; the backend is chosen by [`DatabaseConfig`].

mod config;
mod connector;
mod health;
mod transaction;

pub use config::{DatabaseConfig, DatabaseDriver};
pub use connector::{connect, connect_with_retry, run_migrations};
pub use health::{check_health, check_health_detailed, HealthStatus};
pub use transaction::{TransactionManager, UnitOfWork, WorkFuture};

// Re-export SeaORM types for convenience
pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
