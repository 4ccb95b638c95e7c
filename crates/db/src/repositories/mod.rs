//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every mutating ledger operation runs inside a single
//! serializable transaction and under the matching recompute lock.

pub mod caisse;
pub mod charge;
pub mod client;
pub mod expense;

pub use caisse::{
    CaisseError, CaisseRepository, CreateOperationInput, OperationCreated, SoldeCaisse,
    UpdateOperationInput,
};
pub use charge::{
    ChargeCreated, ChargeError, ChargeRepository, CreateChargeInput, UpdateChargeInput, YearCharges,
};
pub use client::{ClientError, ClientRepository, CreateClientInput, UpdateClientInput};
pub use expense::{CreateExpenseInput, ExpenseCreated, ExpenseError, ExpenseRepository};
