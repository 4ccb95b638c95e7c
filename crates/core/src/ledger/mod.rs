//! Balance recalculation primitive.
//!
//! Both the monthly charge ledger and the cash register ledger chain
//! before/after balance snapshots over an ordered sequence of signed
//! deltas. The chaining itself is implemented once, here.

pub mod chain;
pub mod error;

#[cfg(test)]
mod chain_props;

pub use chain::{ChainEntry, recompute_chain};
pub use error::LedgerError;
