// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 The atm-demo-rs authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use atm_demo_rs::{AtmError, AuthResult, Session, Transaction};
use clap::Parser;
use csv::Writer;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufRead, Write as IoWrite};
use std::path::PathBuf;
use std::process;

/// ATM Simulator - Interactive single-user ATM session
///
/// Prompts for a PIN, then runs a menu loop (check balance, deposit,
/// withdraw, transaction history, exit). Set RUST_LOG=debug for a trace
/// of state transitions.
#[derive(Parser, Debug)]
#[command(name = "atm-demo-rs")]
#[command(about = "An interactive ATM session simulator", long_about = None)]
struct Args {
    /// 4-digit secret PIN for this session
    #[arg(long, default_value = "1234")]
    pin: String,

    /// Opening balance
    #[arg(long, default_value = "10000.00")]
    balance: Decimal,

    /// Write the transaction history as CSV to this file on exit
    #[arg(long, value_name = "FILE")]
    receipt: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if args.pin.len() != 4 || !args.pin.chars().all(|c| c.is_ascii_digit()) {
        eprintln!("Error: --pin must be exactly 4 digits");
        process::exit(1);
    }
    if args.balance < Decimal::ZERO {
        eprintln!("Error: --balance must not be negative");
        process::exit(1);
    }

    let mut session = Session::new(args.pin, args.balance);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let history = run(&mut session, &mut lines);

    if let Some(path) = &args.receipt {
        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error creating receipt file '{}': {}", path.display(), e);
                process::exit(1);
            }
        };
        if let Err(e) = write_receipt(&history, file) {
            eprintln!("Error writing receipt: {}", e);
            process::exit(1);
        }
    }
}

/// Interactive loop: PIN prompt, then the main menu, until EOF or lockout.
///
/// Returns the transaction history as last seen while authenticated, for
/// the optional receipt export. The history is only readable from an
/// authenticated session, so it is snapshotted after every menu round.
fn run<I>(session: &mut Session, lines: &mut I) -> Vec<Transaction>
where
    I: Iterator<Item = io::Result<String>>,
{
    println!("=== ATM Machine Simulator ===");
    let mut receipt = Vec::new();

    loop {
        if session.is_locked() {
            println!("Card Blocked. Please contact bank.");
            return receipt;
        }

        if !session.is_authenticated() {
            if !pin_prompt(session, lines) {
                return receipt;
            }
            continue;
        }

        let more = menu(session, lines);
        if let Ok(history) = session.history() {
            receipt = history;
        }
        if !more {
            return receipt;
        }
    }
}

/// Solicits PIN candidates until verified, locked, or EOF.
///
/// Returns false when input is exhausted.
fn pin_prompt<I>(session: &mut Session, lines: &mut I) -> bool
where
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        print!("Enter your 4-digit PIN: ");
        let _ = io::stdout().flush();

        let Some(Ok(line)) = lines.next() else {
            return false;
        };

        match session.submit_pin(&line) {
            AuthResult::Success => {
                println!("PIN verified successfully!");
                return true;
            }
            AuthResult::IncorrectPin { remaining } => {
                println!("Incorrect PIN. {} attempt(s) remaining.", remaining);
            }
            AuthResult::MalformedPin => {
                println!("Please enter a valid 4-digit PIN.");
            }
            AuthResult::LockedOut | AuthResult::AlreadyLocked => {
                return true; // the outer loop prints the blocked screen
            }
        }
    }
}

/// One round of the main menu. Returns false when input is exhausted.
fn menu<I>(session: &mut Session, lines: &mut I) -> bool
where
    I: Iterator<Item = io::Result<String>>,
{
    println!();
    println!("Main Menu");
    println!("  1) Check Balance");
    println!("  2) Deposit Money");
    println!("  3) Withdraw Money");
    println!("  4) Transaction History");
    println!("  5) Exit");
    print!("Choose an option: ");
    let _ = io::stdout().flush();

    let Some(Ok(choice)) = lines.next() else {
        return false;
    };

    match choice.trim() {
        "1" => match session.check_balance() {
            Ok(balance) => println!("Your current balance is {:.2}", balance),
            Err(e) => println!("{}", e),
        },
        "2" => {
            println!("Deposit Rules:");
            println!("  - Maximum 50000 per transaction.");
            println!("  - Enter a positive amount.");
            print!("Enter amount to deposit: ");
            let _ = io::stdout().flush();

            let Some(Ok(line)) = lines.next() else {
                return false;
            };
            match parse_amount(&line).and_then(|amount| session.deposit(amount)) {
                Ok(receipt) => println!("{}", receipt.message),
                Err(e) => println!("{}", e),
            }
        }
        "3" => {
            println!("Withdrawal Rules:");
            println!("  - Amount must be in multiples of 100.");
            println!("  - Maximum 20000 per transaction.");
            println!("  - Must maintain minimum balance of 1000 after withdrawal.");
            print!("Enter amount to withdraw: ");
            let _ = io::stdout().flush();

            let Some(Ok(line)) = lines.next() else {
                return false;
            };
            match parse_amount(&line).and_then(|amount| session.withdraw(amount)) {
                Ok(receipt) => println!("{}", receipt.message),
                Err(e) => println!("{}", e),
            }
        }
        "4" => match session.history() {
            Ok(history) if history.is_empty() => println!("No transactions yet."),
            Ok(history) => {
                println!("Recent Transactions:");
                for tx in &history {
                    println!(
                        "- {} {:.2}  ({})",
                        tx.kind,
                        tx.amount,
                        tx.time.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
            Err(e) => println!("{}", e),
        },
        "5" => {
            println!("Thank you for banking with us!");
            session.logout();
        }
        other => println!("Unknown option '{}'", other.trim()),
    }

    true
}

/// Maps raw text to the core's optional-amount contract.
///
/// Empty input means no amount was supplied; text that does not parse as
/// a decimal is an invalid amount.
fn parse_amount(line: &str) -> Result<Option<Decimal>, AtmError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<Decimal>()
        .map(Some)
        .map_err(|_| AtmError::InvalidAmount)
}

/// Writes the transaction history to a CSV writer.
///
/// Columns: `kind, amount, time`, amounts at 2 decimal places, most
/// recent transaction first.
fn write_receipt<W: IoWrite>(history: &[Transaction], writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for tx in history {
        wtr.serialize(tx)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn feed(input: &str) -> impl Iterator<Item = io::Result<String>> + '_ {
        input.lines().map(|l| Ok(l.to_string()))
    }

    #[test]
    fn parse_amount_empty_is_missing() {
        assert_eq!(parse_amount(""), Ok(None));
        assert_eq!(parse_amount("   "), Ok(None));
    }

    #[test]
    fn parse_amount_accepts_decimals() {
        assert_eq!(parse_amount("500"), Ok(Some(dec!(500))));
        assert_eq!(parse_amount(" 500.25 "), Ok(Some(dec!(500.25))));
    }

    #[test]
    fn parse_amount_rejects_text() {
        assert_eq!(parse_amount("abc"), Err(AtmError::InvalidAmount));
        assert_eq!(parse_amount("12x"), Err(AtmError::InvalidAmount));
    }

    #[test]
    fn run_verifies_pin_and_deposits() {
        let mut session = Session::default();
        let input = "1234\n2\n500\n5\n";
        let mut lines = feed(input);
        let receipt = run(&mut session, &mut lines);

        // Deposit committed, then option 5 logged out
        assert!(!session.is_authenticated());
        assert_eq!(receipt.len(), 1);
        assert_eq!(receipt[0].amount, dec!(500));

        session.submit_pin("1234");
        assert_eq!(session.check_balance().unwrap(), dec!(10500.00));
    }

    #[test]
    fn run_stops_at_blocked_card() {
        let mut session = Session::default();
        let input = "0000\n0000\n0000\n";
        let mut lines = feed(input);
        run(&mut session, &mut lines);

        assert!(session.is_locked());
    }

    #[test]
    fn receipt_csv_has_expected_columns() {
        let mut session = Session::default();
        session.submit_pin("1234");
        session.deposit(Some(dec!(500))).unwrap();
        session.withdraw(Some(dec!(100))).unwrap();

        let history = session.history().unwrap();
        let mut output = Vec::new();
        write_receipt(&history, &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.contains("kind,amount,time"));
        assert!(output_str.contains("Withdrawal,100.00"));
        assert!(output_str.contains("Deposit,500.00"));
        // Most recent first
        let withdrawal_pos = output_str.find("Withdrawal").unwrap();
        let deposit_pos = output_str.find("Deposit").unwrap();
        assert!(withdrawal_pos < deposit_pos);
    }
}
