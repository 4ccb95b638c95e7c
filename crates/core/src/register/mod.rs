//! Cash register ("Caisse CGM") rules.
//!
//! The register's balance is virtual: a derived base (historical fee
//! receipts) plus the chain of discrete operations. This module owns the
//! direction rules, the non-negative guard, and the inversion used when
//! editing an existing operation.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::{apply_operation, balance_before, is_credit, signed_amount};
pub use types::{Direction, OperationKind};
