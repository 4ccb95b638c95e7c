//! Core ledger logic for Cogest.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All balance arithmetic, chaining rules, and label semantics live here.
//!
//! # Modules
//!
//! - `ledger` - Balance recalculation primitive shared by both ledgers
//! - `charges` - Monthly charge rules (carry-forward, label semantics)
//! - `register` - Cash register rules (direction, guards, inversion)

pub mod charges;
pub mod ledger;
pub mod register;
