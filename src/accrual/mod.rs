//! Daily compound accrual: the pure catch-up reconciler and the
//! what-if projection. Both share one truncation rule so previews can
//! never drift from real accrual.

pub mod projection;
pub mod reconciler;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// One day of interest: `floor(balance * rate / 100)`.
///
/// Integer truncation, never rounding up. Computed in decimal
/// arithmetic so fractional rates stay exact across platforms.
pub fn daily_interest(balance: u64, rate: Decimal) -> u64 {
    if balance == 0 || rate <= Decimal::ZERO {
        return 0;
    }
    let step = Decimal::from(balance) * rate / Decimal::ONE_HUNDRED;
    step.floor().to_u64().unwrap_or(u64::MAX)
}
