//! Shared domain types.

pub mod money;

pub use money::{DINAR_DP, montant_valide, normalize};
