//! Catch-up accrual example.
//!
//! Demonstrates how a gap since last use is reconciled into day-by-day
//! interest transactions before any user operation runs.

use chrono::{Days, NaiveDate};
use timebank_engine::clock::FixedClock;
use timebank_engine::core::snapshot::MemoryStore;
use timebank_engine::session::TimeBank;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  timebank: Catch-Up Accrual Example      ║");
    println!("╚══════════════════════════════════════════╝\n");

    let store = MemoryStore::new();
    let day_one = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

    // --- Session 1: save up 1000 minutes ---
    println!("━━━ Day 1: deposit 1000 minutes ━━━\n");
    {
        let (mut bank, _) = TimeBank::open(&store, FixedClock(day_one));
        bank.deposit(1000).unwrap();
        println!("Balance: {} min at {}%/day\n", bank.balance(), bank.rate());
    }

    // --- Session 2: come back a week later ---
    println!("━━━ Day 8: reopen after a week away ━━━\n");
    let (bank, report) = TimeBank::open(&store, FixedClock(day_one + Days::new(7)));

    println!(
        "Merged {} interest transactions (+{} min):\n",
        report.accrued_events, report.accrued_minutes
    );
    for tx in bank.transactions().iter().rev() {
        println!(
            "  {}  {:<10}  +{:<5}  balance {}",
            tx.date(),
            tx.kind().to_string(),
            tx.amount(),
            tx.balance_after()
        );
    }
    println!("\nFinal balance: {} min", bank.balance());
}
