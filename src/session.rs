use crate::accrual::projection::projected_balance;
use crate::accrual::reconciler::reconcile;
use crate::clock::Clock;
use crate::core::ledger::{DailyTotals, Ledger, LedgerError, TxFilter};
use crate::core::snapshot::SnapshotStore;
use crate::core::transaction::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Where the opening snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// No snapshot existed; started from defaults.
    Fresh,
    /// A snapshot was loaded and reconciled.
    Loaded,
    /// A snapshot existed but could not be read; started from
    /// defaults. Collaborators should warn the user about the loss.
    CorruptFallback,
}

/// What happened while opening the bank: snapshot provenance and the
/// catch-up accrual that was merged before any user operation.
#[derive(Debug, Clone, Copy)]
pub struct OpenReport {
    pub origin: SnapshotOrigin,
    /// Number of interest transactions merged.
    pub accrued_events: usize,
    /// Total minutes of interest merged.
    pub accrued_minutes: u64,
}

/// One user's time bank: a ledger wired to a snapshot store and a
/// date source.
///
/// [`TimeBank::open`] replays the startup sequence the engine
/// requires: load the last snapshot, run the pure reconciler against
/// it, merge the resulting patch, and persist, all before any
/// user-initiated operation is possible. Every later mutation saves a
/// complete snapshot; saves are best-effort and never fail the
/// operation (failures are logged).
pub struct TimeBank<S: SnapshotStore, C: Clock> {
    ledger: Ledger,
    store: S,
    clock: C,
}

impl<S: SnapshotStore, C: Clock> TimeBank<S, C> {
    pub fn open(store: S, clock: C) -> (Self, OpenReport) {
        let today = clock.today();

        let (ledger, origin) = match store.load() {
            Ok(Some(snapshot)) => (Ledger::from_snapshot(snapshot, today), SnapshotOrigin::Loaded),
            Ok(None) => (Ledger::new(today), SnapshotOrigin::Fresh),
            Err(e) => {
                log::warn!("discarding unreadable snapshot, starting over: {e}");
                (Ledger::new(today), SnapshotOrigin::CorruptFallback)
            }
        };

        let mut bank = Self {
            ledger,
            store,
            clock,
        };
        let mut report = OpenReport {
            origin,
            accrued_events: 0,
            accrued_minutes: 0,
        };

        if origin == SnapshotOrigin::Loaded {
            let patch = reconcile(
                bank.ledger.balance(),
                bank.ledger.rate(),
                bank.ledger.last_update(),
                today,
            );
            report.accrued_events = patch.events.len();
            report.accrued_minutes = patch.total_interest();
            if !patch.is_empty() {
                log::info!(
                    "accrued {} interest transactions ({} minutes) since {}",
                    report.accrued_events,
                    report.accrued_minutes,
                    bank.ledger.last_update()
                );
            }
            bank.ledger.merge_accrual(patch);
            bank.persist();
        }

        (bank, report)
    }

    // --- Mutations (each persists a complete snapshot) ---

    pub fn deposit(&mut self, minutes: u64) -> Result<Transaction, LedgerError> {
        let tx = self.ledger.deposit(minutes, self.clock.today())?;
        self.persist();
        Ok(tx)
    }

    pub fn withdraw(&mut self, minutes: u64) -> Result<Transaction, LedgerError> {
        let tx = self.ledger.withdraw(minutes, self.clock.today())?;
        self.persist();
        Ok(tx)
    }

    pub fn set_rate(&mut self, rate: Decimal) -> Result<(), LedgerError> {
        self.ledger.set_rate(rate)?;
        self.persist();
        Ok(())
    }

    /// Wipe everything. The caller is responsible for having confirmed
    /// with the user first.
    pub fn reset(&mut self) {
        self.ledger.reset(self.clock.today());
        self.persist();
    }

    // --- Read-through views ---

    pub fn balance(&self) -> u64 {
        self.ledger.balance()
    }

    pub fn rate(&self) -> Decimal {
        self.ledger.rate()
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.ledger.transactions()
    }

    pub fn query<'a>(
        &'a self,
        filter: &'a TxFilter,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.ledger.query(filter)
    }

    pub fn daily_aggregate(&self) -> BTreeMap<NaiveDate, DailyTotals> {
        self.ledger.daily_aggregate()
    }

    /// What-if preview of the current balance after `days` at the
    /// current rate.
    pub fn project(&self, days: u32) -> u64 {
        projected_balance(self.ledger.balance(), self.ledger.rate(), days)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.ledger.snapshot()) {
            log::warn!("failed to persist snapshot: {e}");
        }
    }
}
