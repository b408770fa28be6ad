use crate::accrual::daily_interest;
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

/// One day's interest, before it becomes a ledger transaction.
/// Ids are assigned later, when the ledger merges the patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccrualEvent {
    pub date: NaiveDate,
    pub amount: u64,
    pub balance_after: u64,
}

/// The reconciler's proposed state transition: zero or more interest
/// events in chronological order, the balance after all of them, and
/// the date accrual is now reconciled through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccrualPatch {
    pub events: Vec<AccrualEvent>,
    pub final_balance: u64,
    pub reconciled_through: NaiveDate,
}

impl AccrualPatch {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total minutes of interest across all events.
    pub fn total_interest(&self) -> u64 {
        self.events.iter().map(|ev| ev.amount).sum()
    }
}

/// Translate the gap since `last_update` into day-by-day compounding.
///
/// Pure and deterministic: same inputs, same patch. Each elapsed day
/// earns `floor(balance * rate / 100)` on the running balance, dated
/// `last_update + i + 1`. Days whose truncated interest is zero emit
/// no event but still count (the loop skips, it does not stop).
///
/// A gap of zero or negative days, or a zero balance, produces an
/// empty patch. The patch still carries `reconciled_through = today`
/// so the ledger's last-update date moves forward on merge.
///
/// Day-by-day recomputation is deliberate: a closed-form compound
/// formula is not equivalent under per-day truncation, and per-day
/// events keep the log auditable. Cost is O(days since last use),
/// bounded by real elapsed time.
pub fn reconcile(
    balance: u64,
    rate: Decimal,
    last_update: NaiveDate,
    today: NaiveDate,
) -> AccrualPatch {
    let mut patch = AccrualPatch {
        events: Vec::new(),
        final_balance: balance,
        reconciled_through: today,
    };

    let days_passed = (today - last_update).num_days();
    if days_passed <= 0 || balance == 0 {
        return patch;
    }

    let mut current = balance;
    for i in 0..days_passed as u64 {
        let interest = daily_interest(current, rate);
        if interest > 0 {
            current = current.saturating_add(interest);
            patch.events.push(AccrualEvent {
                date: last_update + Days::new(i + 1),
                amount: interest,
                balance_after: current,
            });
        }
    }
    patch.final_balance = current;
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn test_reference_sequence() {
        // 1000 @ 10% over 3 days: 100, 110, 121, ending at 1331.
        let patch = reconcile(1000, dec!(10), day(1), day(4));
        let amounts: Vec<u64> = patch.events.iter().map(|ev| ev.amount).collect();
        assert_eq!(amounts, vec![100, 110, 121]);
        assert_eq!(patch.final_balance, 1331);
        assert_eq!(patch.total_interest(), 331);

        let dates: Vec<NaiveDate> = patch.events.iter().map(|ev| ev.date).collect();
        assert_eq!(dates, vec![day(2), day(3), day(4)]);
        assert_eq!(patch.events.last().unwrap().balance_after, 1331);
    }

    #[test]
    fn test_same_day_is_noop() {
        let patch = reconcile(1000, dec!(10), day(4), day(4));
        assert!(patch.is_empty());
        assert_eq!(patch.final_balance, 1000);
        assert_eq!(patch.reconciled_through, day(4));
    }

    #[test]
    fn test_clock_gone_backwards_is_noop() {
        let patch = reconcile(1000, dec!(10), day(10), day(4));
        assert!(patch.is_empty());
        assert_eq!(patch.final_balance, 1000);
        // Still re-anchors on today.
        assert_eq!(patch.reconciled_through, day(4));
    }

    #[test]
    fn test_zero_balance_accrues_nothing() {
        let patch = reconcile(0, dec!(10), day(1), day(30));
        assert!(patch.is_empty());
        assert_eq!(patch.final_balance, 0);
    }

    #[test]
    fn test_zero_interest_days_skip_but_count() {
        // 9 @ 10% truncates to 0 every day: no events, balance frozen,
        // but the gap is still consumed.
        let patch = reconcile(9, dec!(10), day(1), day(11));
        assert!(patch.is_empty());
        assert_eq!(patch.final_balance, 9);
        assert_eq!(patch.reconciled_through, day(11));
    }

    #[test]
    fn test_mixed_zero_and_nonzero_days() {
        // 5 @ 25%: day 1 floor(1.25) = 1 -> 6, day 2 floor(1.5) = 1 -> 7,
        // day 3 floor(1.75) = 1 -> 8, day 4 floor(2.0) = 2 -> 10.
        let patch = reconcile(5, dec!(25), day(1), day(5));
        let amounts: Vec<u64> = patch.events.iter().map(|ev| ev.amount).collect();
        assert_eq!(amounts, vec![1, 1, 1, 2]);
        assert_eq!(patch.final_balance, 10);
    }

    #[test]
    fn test_deterministic_replay() {
        let a = reconcile(123_456, dec!(7.5), day(1), day(20));
        let b = reconcile(123_456, dec!(7.5), day(1), day(20));
        assert_eq!(a, b);
    }

    #[test]
    fn test_long_absence_runs_to_completion() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        // Low rate keeps the numbers reasonable over ~3 years.
        let patch = reconcile(1_000_000, dec!(0.01), start, end);
        assert_eq!(patch.events.len() as i64, (end - start).num_days());
        assert!(patch.final_balance > 1_000_000);
    }
}
