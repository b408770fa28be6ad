//! Foundational types: transactions, the ledger, and snapshot
//! persistence.

pub mod ledger;
pub mod snapshot;
pub mod transaction;
