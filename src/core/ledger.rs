use crate::accrual::reconciler::AccrualPatch;
use crate::core::snapshot::Snapshot;
use crate::core::transaction::{Transaction, TxId, TxKind};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Daily interest rate applied when no rate has ever been configured,
/// in percent per day.
pub fn default_rate() -> Decimal {
    dec!(10)
}

/// Errors returned by ledger mutations.
///
/// All variants are caller input errors, reported synchronously and
/// never retried. A failed operation leaves the ledger untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("amount must be a positive number of minutes")]
    InvalidAmount { amount: u64 },
    #[error("withdrawal of {requested} minutes exceeds available balance of {available}")]
    InsufficientBalance { requested: u64, available: u64 },
    #[error("interest rate must be non-negative, got {rate}")]
    InvalidRate { rate: Decimal },
}

/// Date constraint for history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// No date constraint.
    All,
    /// Dates on or after `today - days`, relative to a caller-supplied today.
    Trailing { days: u32, today: NaiveDate },
    /// Inclusive on both ends.
    Between { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            DateRange::All => true,
            DateRange::Trailing { days, today } => {
                let cutoff = today
                    .checked_sub_days(Days::new(u64::from(*days)))
                    .unwrap_or(NaiveDate::MIN);
                date >= cutoff
            }
            DateRange::Between { start, end } => date >= *start && date <= *end,
        }
    }
}

/// Filter for [`Ledger::query`]. The default matches everything.
#[derive(Debug, Clone, Copy)]
pub struct TxFilter {
    pub kind: Option<TxKind>,
    pub range: DateRange,
}

impl Default for TxFilter {
    fn default() -> Self {
        Self {
            kind: None,
            range: DateRange::All,
        }
    }
}

impl TxFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.kind.map_or(true, |k| tx.kind() == k) && self.range.contains(tx.date())
    }
}

/// Per-day totals produced by [`Ledger::daily_aggregate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub deposited: u64,
    pub withdrawn: u64,
    pub interest: u64,
}

/// The time-bank ledger: current balance plus the append-only,
/// newest-first history that explains it.
///
/// The ledger exclusively owns its state. Accrual is computed outside
/// (see [`crate::accrual::reconciler::reconcile`]) and handed back as a
/// patch, which [`Ledger::merge_accrual`] applies atomically.
///
/// Invariant: for any transaction at position i (newest-first),
/// `balance_after` equals the next-older entry's `balance_after` plus
/// the amount for credits or minus it for withdrawals, and the oldest
/// entry's implied prior balance is 0. [`Ledger::verify_chain`] checks
/// this.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Current balance in minutes. Never negative by construction.
    total_time: u64,
    /// Newest-first. Insertion order is recency order.
    transactions: Vec<Transaction>,
    /// Percent per day.
    rate: Decimal,
    /// Date accrual was last reconciled through.
    last_update: NaiveDate,
    next_id: u64,
}

impl Ledger {
    /// An empty ledger with the default rate, reconciled through `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            total_time: 0,
            transactions: Vec::new(),
            rate: default_rate(),
            last_update: today,
            next_id: 1,
        }
    }

    /// Rebuild a ledger from a persisted snapshot.
    ///
    /// A snapshot without a last-update date is treated as reconciled
    /// through `today`, which makes the subsequent catch-up a no-op.
    pub fn from_snapshot(snapshot: Snapshot, today: NaiveDate) -> Self {
        let next_id = snapshot
            .transactions
            .iter()
            .map(|tx| tx.id().raw() + 1)
            .max()
            .unwrap_or(1);
        Self {
            total_time: snapshot.total_time,
            transactions: snapshot.transactions,
            rate: snapshot.interest_rate,
            last_update: snapshot.last_update.unwrap_or(today),
            next_id,
        }
    }

    /// The persisted form of the current state. Always complete, never
    /// a delta.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            total_time: self.total_time,
            transactions: self.transactions.clone(),
            interest_rate: self.rate,
            last_update: Some(self.last_update),
        }
    }

    // --- Accessors ---

    pub fn balance(&self) -> u64 {
        self.total_time
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn last_update(&self) -> NaiveDate {
        self.last_update
    }

    /// Full history, newest-first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    // --- Mutations ---

    /// Record a deposit of `amount` minutes dated `date`.
    pub fn deposit(&mut self, amount: u64, date: NaiveDate) -> Result<Transaction, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }
        let balance_after = self.total_time.saturating_add(amount);
        Ok(self.push(TxKind::Deposit, amount, date, balance_after))
    }

    /// Record a withdrawal of `amount` minutes dated `date`.
    ///
    /// The balance can never go negative: a withdrawal larger than the
    /// current balance fails with `InsufficientBalance` and changes
    /// nothing.
    pub fn withdraw(&mut self, amount: u64, date: NaiveDate) -> Result<Transaction, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }
        if amount > self.total_time {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: self.total_time,
            });
        }
        let balance_after = self.total_time - amount;
        Ok(self.push(TxKind::Withdrawal, amount, date, balance_after))
    }

    /// Replace the daily rate. Applies prospectively only: already
    /// recorded transactions are never recomputed.
    pub fn set_rate(&mut self, rate: Decimal) -> Result<(), LedgerError> {
        if rate < Decimal::ZERO {
            return Err(LedgerError::InvalidRate { rate });
        }
        self.rate = rate;
        Ok(())
    }

    /// Clear balance and history and restore the default rate.
    /// Irreversible; any confirmation happens at the caller.
    pub fn reset(&mut self, today: NaiveDate) {
        self.total_time = 0;
        self.transactions.clear();
        self.rate = default_rate();
        self.last_update = today;
        self.next_id = 1;
    }

    /// Apply an accrual patch produced by the reconciler.
    ///
    /// Events arrive in chronological order and are prepended in
    /// reverse so the history stays newest-first. Ids are assigned in
    /// chronological order. The ledger is mutated in one step only
    /// after the whole patch has been materialized.
    pub fn merge_accrual(&mut self, patch: AccrualPatch) {
        let mut incoming: Vec<Transaction> = patch
            .events
            .iter()
            .map(|ev| {
                Transaction::new(
                    self.alloc_id(),
                    TxKind::InterestAccrual,
                    ev.amount,
                    ev.date,
                    ev.balance_after,
                )
            })
            .collect();
        incoming.reverse();
        incoming.append(&mut self.transactions);
        self.transactions = incoming;
        self.total_time = patch.final_balance;
        self.last_update = patch.reconciled_through;
    }

    // --- Queries ---

    /// Lazy, restartable view of the history matching `filter`,
    /// newest-first. An empty result is a valid outcome, not an error.
    pub fn query<'a>(
        &'a self,
        filter: &'a TxFilter,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions.iter().filter(move |tx| filter.matches(tx))
    }

    /// Group the full history by date, summing amounts per kind.
    /// Read-only; keys iterate oldest-first.
    pub fn daily_aggregate(&self) -> BTreeMap<NaiveDate, DailyTotals> {
        let mut stats: BTreeMap<NaiveDate, DailyTotals> = BTreeMap::new();
        for tx in &self.transactions {
            let entry = stats.entry(tx.date()).or_default();
            match tx.kind() {
                TxKind::Deposit => entry.deposited += tx.amount(),
                TxKind::Withdrawal => entry.withdrawn += tx.amount(),
                TxKind::InterestAccrual => entry.interest += tx.amount(),
            }
        }
        stats
    }

    /// Verify the running-balance invariant over the whole history.
    pub fn verify_chain(&self) -> bool {
        let head = self
            .transactions
            .first()
            .map(|tx| tx.balance_after())
            .unwrap_or(0);
        if head != self.total_time {
            return false;
        }
        for pair in self.transactions.windows(2) {
            if pair[0].balance_before() != Some(pair[1].balance_after()) {
                return false;
            }
        }
        match self.transactions.last() {
            Some(oldest) => oldest.balance_before() == Some(0),
            None => true,
        }
    }

    fn alloc_id(&mut self) -> TxId {
        let id = TxId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(
        &mut self,
        kind: TxKind,
        amount: u64,
        date: NaiveDate,
        balance_after: u64,
    ) -> Transaction {
        let tx = Transaction::new(self.alloc_id(), kind, amount, date, balance_after);
        self.transactions.insert(0, tx.clone());
        self.total_time = balance_after;
        // Every mutation re-stamps the snapshot date.
        self.last_update = date;
        tx
    }
}
