//! What-if projection example.
//!
//! Previews compounding without touching the ledger, and shows that
//! the preview matches the accrual that later actually happens.

use chrono::{Days, NaiveDate};
use rust_decimal_macros::dec;
use timebank_engine::accrual::projection::projected_balance;
use timebank_engine::accrual::reconciler::reconcile;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  timebank: What-If Projection Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let base = 1000u64;
    let rate = dec!(10);

    println!("Starting from {} min at {}%/day:\n", base, rate);
    for days in [1u32, 3, 7, 14, 30] {
        println!(
            "  after {:>2} day(s): {:>8} min",
            days,
            projected_balance(base, rate, days)
        );
    }

    // The projection is a promise the reconciler keeps.
    let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    let patch = reconcile(base, rate, start, start + Days::new(30));
    println!(
        "\nReconciling the same 30-day gap for real: {} min ({} transactions)",
        patch.final_balance,
        patch.events.len()
    );
    assert_eq!(patch.final_balance, projected_balance(base, rate, 30));
    println!("Projection and accrual agree.");
}
