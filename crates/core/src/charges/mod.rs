//! Monthly charge ledger rules.
//!
//! A client's charges for a year form a chronological chain: each row
//! carries a debit (`montant`), a credit (`avance`) and the cumulative
//! `solde_restant` after the row. The chain opens with the previous
//! year's closing balance (the carry-in).

pub mod labels;
pub mod service;

pub use service::{
    ChargeAmounts, carry_in, chain_for_year, predecessor_balance, solde_delta,
};
