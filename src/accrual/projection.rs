use crate::accrual::daily_interest;
use rust_decimal::Decimal;

/// What-if preview: the balance after `days` of compounding at `rate`,
/// starting from `base`. Touches no ledger state and emits nothing.
///
/// Uses the exact per-day truncation the reconciler uses, so a
/// projection agrees with eventual real accrual as long as no deposits
/// or withdrawals happen in between.
pub fn projected_balance(base: u64, rate: Decimal, days: u32) -> u64 {
    let mut balance = base;
    for _ in 0..days {
        balance = balance.saturating_add(daily_interest(balance, rate));
    }
    balance
}
