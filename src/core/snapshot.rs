use crate::core::ledger::default_rate;
use crate::core::transaction::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors arising from snapshot persistence.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The stored blob exists but could not be understood. The engine
    /// falls back to defaults; collaborators should warn the user.
    #[error("persisted snapshot is corrupt: {reason}")]
    Corrupt { reason: String },
    #[error("snapshot could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The complete persisted state of one time bank.
///
/// Wire format (all fields optional with documented defaults):
///
/// ```json
/// {
///   "totalTime": 1331,
///   "transactions": [
///     { "id": 4, "kind": "InterestAccrual", "amount": 121,
///       "date": "2026-08-29", "balanceAfter": 1331 }
///   ],
///   "interestRate": "10",
///   "lastUpdateDate": "2026-08-29"
/// }
/// ```
///
/// `interestRate` defaults to 10 percent per day when absent; a missing
/// `lastUpdateDate` is resolved to "today" at load time, which skips
/// the catch-up accrual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub total_time: u64,
    /// Newest-first, matching the in-memory ledger order.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default = "default_rate")]
    pub interest_rate: Decimal,
    #[serde(rename = "lastUpdateDate", default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<NaiveDate>,
}

/// The external collaborator contract: a key-value blob store that can
/// hand back the last snapshot and accept a complete replacement.
pub trait SnapshotStore {
    /// `Ok(None)` means no snapshot has ever been written.
    fn load(&self) -> Result<Option<Snapshot>, SnapshotError>;
    /// Writes the whole snapshot, never a delta.
    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn load(&self) -> Result<Option<Snapshot>, SnapshotError> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        (**self).save(snapshot)
    }
}

/// Whole-file JSON store, the production persistence medium.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, SnapshotError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SnapshotError::Io(e)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| SnapshotError::Corrupt {
                reason: e.to_string(),
            })
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory store for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            slot: RefCell::new(Some(snapshot)),
        }
    }

    /// The last snapshot saved, if any.
    pub fn stored(&self) -> Option<Snapshot> {
        self.slot.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, SnapshotError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        *self.slot.borrow_mut() = Some(snapshot.clone());
        Ok(())
    }
}
