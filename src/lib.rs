//! # timebank-engine
//!
//! Personal time-bank ledger with deterministic daily compound accrual.
//!
//! The user deposits and withdraws minutes; the balance earns a
//! configurable percentage of compound interest per elapsed calendar
//! day. However long the gap since last use, startup reconciliation
//! replays it day by day into auditable interest transactions and
//! merges them into the ledger before any user operation runs.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: transactions, the ledger, snapshot persistence
//! - **accrual** — Pure catch-up reconciler and what-if projection
//! - **session** — `TimeBank`: store + clock orchestration around the ledger
//! - **clock** — Wall-clock date source, swappable for tests

pub mod accrual;
pub mod clock;
pub mod core;
pub mod session;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::accrual::projection::projected_balance;
    pub use crate::accrual::reconciler::{reconcile, AccrualEvent, AccrualPatch};
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::core::ledger::{DailyTotals, DateRange, Ledger, LedgerError, TxFilter};
    pub use crate::core::snapshot::{
        JsonFileStore, MemoryStore, Snapshot, SnapshotError, SnapshotStore,
    };
    pub use crate::core::transaction::{Transaction, TxId, TxKind};
    pub use crate::session::{OpenReport, SnapshotOrigin, TimeBank};
}
