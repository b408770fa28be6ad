//! timebank CLI
//!
//! Deposit, withdraw, and watch time compound from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Save half an hour
//! timebank deposit 30
//!
//! # Spend some of it
//! timebank withdraw 15
//!
//! # Filtered history as JSON
//! timebank history --kind interest --last-days 30 --format json
//!
//! # What-if preview
//! timebank project --days 30
//! ```

use rust_decimal::Decimal;
use std::process;
use timebank_engine::clock::SystemClock;
use timebank_engine::core::ledger::{DateRange, TxFilter};
use timebank_engine::core::snapshot::JsonFileStore;
use timebank_engine::core::transaction::TxKind;
use timebank_engine::session::{SnapshotOrigin, TimeBank};

fn print_usage() {
    eprintln!(
        r#"timebank — personal time bank with daily compound interest

USAGE:
    timebank <COMMAND> [OPTIONS]

COMMANDS:
    balance     Show the current balance and rate
    deposit     Save minutes: timebank deposit <MINUTES>
    withdraw    Spend minutes: timebank withdraw <MINUTES>
    rate        Show the daily rate, or set it: timebank rate [<PERCENT>]
    history     List transactions, newest first
    stats       Per-day deposit/withdraw/interest totals
    project     Preview compounding: timebank project --days <N>
    reset       Erase everything (requires --yes)
    help        Show this message

OPTIONS (all commands):
    --data <FILE>       Snapshot file (default: timebank.json)

OPTIONS (history):
    --kind <KIND>       deposit, withdrawal, or interest
    --last-days <N>     Only the trailing N days
    --from <DATE>       Range start, ISO date (with --to)
    --to <DATE>         Range end, ISO date (with --from)
    --format <FORMAT>   text (default) or json

EXAMPLES:
    timebank deposit 60
    timebank history --kind withdrawal --last-days 7
    timebank history --from 2026-08-01 --to 2026-08-31 --format json
    timebank project --days 30
    timebank reset --yes"#
    );
}

/// Render minutes as "Xh Ym", the way the balance is shown to users.
fn format_minutes(minutes: u64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Pull a global `--data <FILE>` pair out of the argument list.
fn extract_data_path(args: &mut Vec<String>) -> String {
    if let Some(pos) = args.iter().position(|a| a == "--data") {
        if pos + 1 >= args.len() {
            eprintln!("--data requires a file path");
            process::exit(1);
        }
        let path = args.remove(pos + 1);
        args.remove(pos);
        path
    } else {
        "timebank.json".to_string()
    }
}

fn open_bank(path: &str) -> TimeBank<JsonFileStore, SystemClock> {
    let (bank, report) = TimeBank::open(JsonFileStore::new(path), SystemClock);
    if report.origin == SnapshotOrigin::CorruptFallback {
        eprintln!(
            "warning: '{}' could not be read; starting from an empty ledger",
            path
        );
    }
    if report.accrued_events > 0 {
        eprintln!(
            "applied {} day(s) of interest since last use: +{}",
            report.accrued_events,
            format_minutes(report.accrued_minutes)
        );
    }
    bank
}

fn parse_minutes(raw: &str) -> u64 {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("'{}' is not a valid number of minutes", raw);
        process::exit(1);
    })
}

fn parse_date(raw: &str) -> chrono::NaiveDate {
    raw.parse().unwrap_or_else(|_| {
        eprintln!("'{}' is not a valid ISO date (expected YYYY-MM-DD)", raw);
        process::exit(1);
    })
}

fn parse_kind(raw: &str) -> TxKind {
    match raw {
        "deposit" => TxKind::Deposit,
        "withdrawal" | "withdraw" => TxKind::Withdrawal,
        "interest" => TxKind::InterestAccrual,
        _ => {
            eprintln!("--kind must be deposit, withdrawal, or interest");
            process::exit(1);
        }
    }
}

fn cmd_balance(path: &str) {
    let bank = open_bank(path);
    println!("Balance:  {}", format_minutes(bank.balance()));
    println!("Rate:     {}% per day", bank.rate());
}

fn cmd_deposit(path: &str, args: &[String]) {
    let raw = args.first().unwrap_or_else(|| {
        eprintln!("Usage: timebank deposit <MINUTES>");
        process::exit(1);
    });
    let minutes = parse_minutes(raw);

    let mut bank = open_bank(path);
    match bank.deposit(minutes) {
        Ok(tx) => println!(
            "Deposited {}. Balance: {}",
            format_minutes(tx.amount()),
            format_minutes(tx.balance_after())
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_withdraw(path: &str, args: &[String]) {
    let raw = args.first().unwrap_or_else(|| {
        eprintln!("Usage: timebank withdraw <MINUTES>");
        process::exit(1);
    });
    let minutes = parse_minutes(raw);

    let mut bank = open_bank(path);
    match bank.withdraw(minutes) {
        Ok(tx) => println!(
            "Withdrew {}. Balance: {}",
            format_minutes(tx.amount()),
            format_minutes(tx.balance_after())
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_rate(path: &str, args: &[String]) {
    let mut bank = open_bank(path);
    match args.first() {
        None => println!("{}% per day", bank.rate()),
        Some(raw) => {
            let rate: Decimal = raw.parse().unwrap_or_else(|_| {
                eprintln!("'{}' is not a valid rate", raw);
                process::exit(1);
            });
            match bank.set_rate(rate) {
                Ok(()) => println!("Daily rate set to {}%", rate),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

fn cmd_history(path: &str, args: &[String]) {
    let mut kind = None;
    let mut last_days: Option<u32> = None;
    let mut from = None;
    let mut to = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--kind" => {
                i += 1;
                kind = Some(parse_kind(args.get(i).map(String::as_str).unwrap_or_else(
                    || {
                        eprintln!("--kind requires a value");
                        process::exit(1);
                    },
                )));
            }
            "--last-days" => {
                i += 1;
                last_days = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(
                    || {
                        eprintln!("--last-days requires a number");
                        process::exit(1);
                    },
                ));
            }
            "--from" => {
                i += 1;
                from = Some(parse_date(args.get(i).map(String::as_str).unwrap_or_else(
                    || {
                        eprintln!("--from requires an ISO date");
                        process::exit(1);
                    },
                )));
            }
            "--to" => {
                i += 1;
                to = Some(parse_date(args.get(i).map(String::as_str).unwrap_or_else(
                    || {
                        eprintln!("--to requires an ISO date");
                        process::exit(1);
                    },
                )));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let bank = open_bank(path);
    let range = match (last_days, from, to) {
        (Some(days), None, None) => DateRange::Trailing {
            days,
            today: bank.today(),
        },
        (None, Some(start), Some(end)) => DateRange::Between { start, end },
        (None, None, None) => DateRange::All,
        _ => {
            eprintln!("Use either --last-days or --from/--to, not both");
            process::exit(1);
        }
    };
    let filter = TxFilter { kind, range };
    let matches: Vec<_> = bank.query(&filter).collect();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&matches).unwrap());
    } else if matches.is_empty() {
        println!("No matching transactions.");
    } else {
        for tx in &matches {
            let sign = if tx.kind().is_credit() { "+" } else { "-" };
            println!(
                "{}  {:<10}  {}{:<10}  balance {}",
                tx.date(),
                tx.kind().to_string(),
                sign,
                format_minutes(tx.amount()),
                format_minutes(tx.balance_after())
            );
        }
        println!("\n{} transaction(s)", matches.len());
    }
}

fn cmd_stats(path: &str) {
    let bank = open_bank(path);
    let stats = bank.daily_aggregate();
    if stats.is_empty() {
        println!("No transactions yet.");
        return;
    }
    for (date, totals) in stats.iter().rev() {
        println!("{}", date);
        if totals.deposited > 0 {
            println!("  deposited:  +{}", format_minutes(totals.deposited));
        }
        if totals.withdrawn > 0 {
            println!("  withdrawn:  -{}", format_minutes(totals.withdrawn));
        }
        if totals.interest > 0 {
            println!("  interest:   +{}", format_minutes(totals.interest));
        }
    }
}

fn cmd_project(path: &str, args: &[String]) {
    let mut days: Option<u32> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--days" => {
                i += 1;
                days = Some(args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(
                    || {
                        eprintln!("--days requires a number");
                        process::exit(1);
                    },
                ));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }
    let days = days.unwrap_or_else(|| {
        eprintln!("Usage: timebank project --days <N>");
        process::exit(1);
    });

    let bank = open_bank(path);
    let projected = bank.project(days);
    println!(
        "Balance {} at {}%/day for {} day(s) -> {}",
        format_minutes(bank.balance()),
        bank.rate(),
        days,
        format_minutes(projected)
    );
}

fn cmd_reset(path: &str, args: &[String]) {
    if !args.iter().any(|a| a == "--yes") {
        eprintln!("reset erases the balance and the entire history.");
        eprintln!("Re-run with --yes to confirm.");
        process::exit(1);
    }
    let mut bank = open_bank(path);
    bank.reset();
    println!("All data erased.");
}

fn main() {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let data_path = extract_data_path(&mut args);

    if args.is_empty() {
        print_usage();
        process::exit(1);
    }

    let command = args[0].clone();
    let rest = &args[1..];

    match command.as_str() {
        "balance" => cmd_balance(&data_path),
        "deposit" => cmd_deposit(&data_path, rest),
        "withdraw" => cmd_withdraw(&data_path, rest),
        "rate" => cmd_rate(&data_path, rest),
        "history" => cmd_history(&data_path, rest),
        "stats" => cmd_stats(&data_path),
        "project" => cmd_project(&data_path, rest),
        "reset" => cmd_reset(&data_path, rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
