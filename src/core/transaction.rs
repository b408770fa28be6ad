use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, creation-ordered transaction identifier.
///
/// Ids are allocated by the ledger from a monotonic counter, so sorting by
/// id reproduces insertion order even for transactions dated the same day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TxId(u64);

impl TxId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The three kinds of balance-changing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    Deposit,
    Withdrawal,
    InterestAccrual,
}

impl TxKind {
    /// Whether this kind increases the balance.
    pub fn is_credit(&self) -> bool {
        !matches!(self, TxKind::Withdrawal)
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxKind::Deposit => write!(f, "deposit"),
            TxKind::Withdrawal => write!(f, "withdrawal"),
            TxKind::InterestAccrual => write!(f, "interest"),
        }
    }
}

/// Immutable record of one balance-changing event.
///
/// `amount` is the magnitude of the change in minutes, never signed;
/// the direction comes from `kind`. `balance_after` is the running
/// balance immediately following this transaction, which makes the
/// history self-checking: each entry's implied prior balance must match
/// the `balance_after` of the next-older entry.
///
/// # Examples
///
/// ```
/// use timebank_engine::core::transaction::{Transaction, TxId, TxKind};
/// use chrono::NaiveDate;
///
/// let tx = Transaction::new(
///     TxId::new(1),
///     TxKind::Deposit,
///     30,
///     NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
///     30,
/// );
/// assert_eq!(tx.amount(), 30);
/// assert_eq!(tx.balance_before(), Some(0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Creation-ordered identifier, unique within one ledger.
    id: TxId,
    /// Deposit, withdrawal, or daily interest accrual.
    kind: TxKind,
    /// Magnitude of the change in minutes. Must be positive.
    amount: u64,
    /// Calendar date the event is attributed to (no time of day).
    date: NaiveDate,
    /// Balance immediately following this transaction.
    balance_after: u64,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is zero.
    pub fn new(id: TxId, kind: TxKind, amount: u64, date: NaiveDate, balance_after: u64) -> Self {
        assert!(amount > 0, "transaction amount must be positive");
        Self {
            id,
            kind,
            amount,
            date,
            balance_after,
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn kind(&self) -> TxKind {
        self.kind
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn balance_after(&self) -> u64 {
        self.balance_after
    }

    /// The balance this transaction was applied to, derived from
    /// `balance_after` and the direction of `kind`.
    ///
    /// Returns `None` when the record is internally inconsistent
    /// (a credit whose amount exceeds its resulting balance, or a
    /// withdrawal whose prior balance would overflow).
    pub fn balance_before(&self) -> Option<u64> {
        if self.kind.is_credit() {
            self.balance_after.checked_sub(self.amount)
        } else {
            self.balance_after.checked_add(self.amount)
        }
    }
}
