//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the bureau's tables
//! - Repository abstractions for data access
//! - Database migrations
//! - Process-wide recompute locks for the two ledgers

pub mod entities;
pub mod locks;
pub mod migration;
pub mod repositories;

pub use repositories::{
    CaisseRepository, ChargeRepository, ClientRepository, ExpenseRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
