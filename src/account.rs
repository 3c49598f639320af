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

//! Account management.
//!
//! Deposits and withdrawals run through a gated validation pipeline: the
//! first broken rule determines the error, and a successful operation
//! commits the balance mutation and the ledger append as one unit.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use atm_demo_rs::Account;
//!
//! let account = Account::new(dec!(10000.00));
//! assert_eq!(account.balance(), dec!(10000.00));
//! ```

use crate::error::AtmError;
use crate::ledger::{Ledger, Transaction, TransactionKind};
use log::debug;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Maximum deposit per transaction.
pub const DEPOSIT_LIMIT: Decimal = dec!(50000);
/// Maximum withdrawal per transaction.
pub const WITHDRAW_LIMIT: Decimal = dec!(20000);
/// Withdrawals must be multiples of this denomination.
pub const WITHDRAW_STEP: Decimal = dec!(100);
/// Balance that must remain after any withdrawal.
pub const MIN_BALANCE: Decimal = dec!(1000);

/// Confirmation returned by a committed deposit or withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub new_balance: Decimal,
    pub message: String,
}

#[derive(Debug)]
struct AccountData {
    balance: Decimal,
    ledger: Ledger,
}

impl AccountData {
    fn new(opening_balance: Decimal) -> Self {
        Self {
            balance: opening_balance,
            ledger: Ledger::new(),
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= Decimal::ZERO,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
    }

    /// Vets a deposit amount against the deposit rules, first failure wins.
    fn vet_deposit(&self, amount: Option<Decimal>) -> Result<Decimal, AtmError> {
        let amount = amount.ok_or(AtmError::MissingAmount)?;
        if amount <= Decimal::ZERO {
            return Err(AtmError::InvalidAmount);
        }
        if amount > DEPOSIT_LIMIT {
            return Err(AtmError::LimitExceeded {
                limit: DEPOSIT_LIMIT,
            });
        }
        Ok(amount)
    }

    /// Vets a withdrawal amount; the rules form a gated pipeline and the
    /// error names the first broken rule.
    ///
    /// The insufficient-funds check deliberately precedes the minimum
    /// balance floor, so an overdraw reports `InsufficientFunds` rather
    /// than `BelowMinimumBalance`.
    fn vet_withdrawal(&self, amount: Option<Decimal>) -> Result<Decimal, AtmError> {
        let amount = amount.ok_or(AtmError::MissingAmount)?;
        if amount <= Decimal::ZERO {
            return Err(AtmError::InvalidAmount);
        }
        if amount % WITHDRAW_STEP != Decimal::ZERO {
            return Err(AtmError::NotMultipleOfHundred);
        }
        if amount > WITHDRAW_LIMIT {
            return Err(AtmError::LimitExceeded {
                limit: WITHDRAW_LIMIT,
            });
        }
        if amount > self.balance {
            return Err(AtmError::InsufficientFunds);
        }
        if self.balance - amount < MIN_BALANCE {
            return Err(AtmError::BelowMinimumBalance);
        }
        Ok(amount)
    }
}

/// Session account: balance plus its append-only ledger.
///
/// Balance mutation and ledger append happen under one lock hold, so no
/// caller can observe a balance without its matching ledger entry.
#[derive(Debug)]
pub struct Account {
    inner: Mutex<AccountData>,
}

impl Account {
    pub fn new(opening_balance: Decimal) -> Self {
        Self {
            inner: Mutex::new(AccountData::new(opening_balance)),
        }
    }

    /// Current balance. Pure read.
    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance
    }

    /// Credits the account.
    ///
    /// # Errors
    ///
    /// - [`AtmError::MissingAmount`] - no amount was supplied.
    /// - [`AtmError::InvalidAmount`] - amount is zero or negative.
    /// - [`AtmError::LimitExceeded`] - amount is over 50000.
    ///
    /// Nothing is mutated on any error.
    pub fn deposit(&self, amount: Option<Decimal>) -> Result<Receipt, AtmError> {
        let mut data = self.inner.lock();
        let amount = data.vet_deposit(amount)?;

        data.balance += amount;
        data.ledger.record(TransactionKind::Deposit, amount);
        data.assert_invariants();

        debug!("deposited {}, new balance {}", amount, data.balance);
        Ok(Receipt {
            new_balance: data.balance,
            message: format!(
                "Successfully deposited {:.2}. New balance: {:.2}",
                amount, data.balance
            ),
        })
    }

    /// Debits the account.
    ///
    /// # Errors
    ///
    /// Checked strictly in this order, first failure wins:
    ///
    /// - [`AtmError::MissingAmount`] - no amount was supplied.
    /// - [`AtmError::InvalidAmount`] - amount is zero or negative.
    /// - [`AtmError::NotMultipleOfHundred`] - amount is not a multiple of 100.
    /// - [`AtmError::LimitExceeded`] - amount is over 20000.
    /// - [`AtmError::InsufficientFunds`] - amount exceeds the balance.
    /// - [`AtmError::BelowMinimumBalance`] - less than 1000 would remain.
    ///
    /// Nothing is mutated on any error.
    pub fn withdraw(&self, amount: Option<Decimal>) -> Result<Receipt, AtmError> {
        let mut data = self.inner.lock();
        let amount = data.vet_withdrawal(amount)?;

        data.balance -= amount;
        data.ledger.record(TransactionKind::Withdrawal, amount);
        data.assert_invariants();
        debug_assert!(data.balance >= MIN_BALANCE);

        debug!("withdrew {}, new balance {}", amount, data.balance);
        Ok(Receipt {
            new_balance: data.balance,
            message: format!(
                "Successfully withdrew {:.2}. New balance: {:.2}",
                amount, data.balance
            ),
        })
    }

    /// Most-recent-first snapshot of committed transactions.
    pub fn history(&self) -> Vec<Transaction> {
        self.inner.lock().ledger.history()
    }

    /// Number of committed transactions.
    pub fn transaction_count(&self) -> usize {
        self.inner.lock().ledger.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Validation Pipeline Tests ===
    // These test the private AccountData vetting directly.

    #[test]
    fn vet_deposit_missing_amount() {
        let data = AccountData::new(dec!(10000.00));
        assert_eq!(data.vet_deposit(None), Err(AtmError::MissingAmount));
    }

    #[test]
    fn vet_deposit_rejects_zero_and_negative() {
        let data = AccountData::new(dec!(10000.00));
        assert_eq!(
            data.vet_deposit(Some(Decimal::ZERO)),
            Err(AtmError::InvalidAmount)
        );
        assert_eq!(
            data.vet_deposit(Some(dec!(-50.00))),
            Err(AtmError::InvalidAmount)
        );
    }

    #[test]
    fn vet_deposit_limit_boundary() {
        let data = AccountData::new(dec!(10000.00));
        assert_eq!(data.vet_deposit(Some(dec!(50000))), Ok(dec!(50000)));
        assert_eq!(
            data.vet_deposit(Some(dec!(50000.01))),
            Err(AtmError::LimitExceeded {
                limit: DEPOSIT_LIMIT
            })
        );
    }

    #[test]
    fn vet_withdrawal_first_broken_rule_wins() {
        let data = AccountData::new(dec!(10000.00));
        // Negative amount is invalid before the multiple-of-100 rule applies
        assert_eq!(
            data.vet_withdrawal(Some(dec!(-150))),
            Err(AtmError::InvalidAmount)
        );
        // 30050 is both over the limit and not a multiple of 100;
        // the multiple rule is checked first
        assert_eq!(
            data.vet_withdrawal(Some(dec!(30050))),
            Err(AtmError::NotMultipleOfHundred)
        );
        // 30000 is a clean multiple, so the limit rule fires
        assert_eq!(
            data.vet_withdrawal(Some(dec!(30000))),
            Err(AtmError::LimitExceeded {
                limit: WITHDRAW_LIMIT
            })
        );
    }

    #[test]
    fn vet_withdrawal_insufficient_precedes_floor() {
        let data = AccountData::new(dec!(500.00));
        // 600 > 500 balance: insufficient funds, not the floor rule
        assert_eq!(
            data.vet_withdrawal(Some(dec!(600))),
            Err(AtmError::InsufficientFunds)
        );
        // 400 <= 500 but 500 - 400 = 100 < 1000: floor rule
        assert_eq!(
            data.vet_withdrawal(Some(dec!(400))),
            Err(AtmError::BelowMinimumBalance)
        );
    }

    #[test]
    fn vet_withdrawal_fractional_amount_is_not_a_multiple() {
        let data = AccountData::new(dec!(10000.00));
        assert_eq!(
            data.vet_withdrawal(Some(dec!(150.50))),
            Err(AtmError::NotMultipleOfHundred)
        );
    }

    // === Commit Tests ===

    #[test]
    fn deposit_commits_balance_and_ledger_together() {
        let account = Account::new(dec!(10000.00));
        let receipt = account.deposit(Some(dec!(500.00))).unwrap();

        assert_eq!(receipt.new_balance, dec!(10500.00));
        assert_eq!(account.balance(), dec!(10500.00));
        assert_eq!(account.transaction_count(), 1);

        let history = account.history();
        assert_eq!(history[0].kind, TransactionKind::Deposit);
        assert_eq!(history[0].amount, dec!(500.00));
    }

    #[test]
    fn rejected_deposit_mutates_nothing() {
        let account = Account::new(dec!(10000.00));
        assert!(account.deposit(Some(dec!(60000))).is_err());
        assert_eq!(account.balance(), dec!(10000.00));
        assert_eq!(account.transaction_count(), 0);
    }

    #[test]
    fn rejected_withdrawal_mutates_nothing() {
        let account = Account::new(dec!(10000.00));
        assert!(account.withdraw(Some(dec!(9500.50))).is_err());
        assert!(account.withdraw(Some(dec!(30000))).is_err());
        assert!(account.withdraw(None).is_err());
        assert_eq!(account.balance(), dec!(10000.00));
        assert_eq!(account.transaction_count(), 0);
    }

    #[test]
    fn withdrawal_down_to_exact_floor_succeeds() {
        let account = Account::new(dec!(10000.00));
        let receipt = account.withdraw(Some(dec!(9000))).unwrap();
        assert_eq!(receipt.new_balance, dec!(1000.00));
    }

    #[test]
    fn receipt_messages_are_formatted_to_two_decimals() {
        let account = Account::new(dec!(10000.00));
        let receipt = account.deposit(Some(dec!(500))).unwrap();
        assert_eq!(
            receipt.message,
            "Successfully deposited 500.00. New balance: 10500.00"
        );

        let receipt = account.withdraw(Some(dec!(100))).unwrap();
        assert_eq!(
            receipt.message,
            "Successfully withdrew 100.00. New balance: 10400.00"
        );
    }

    #[test]
    fn deposit_then_floor_gated_withdrawals() {
        let account = Account::new(dec!(10000.00));

        account.deposit(Some(dec!(500))).unwrap();
        assert_eq!(account.balance(), dec!(10500.00));

        // 10500 - 9600 = 900 < 1000
        assert_eq!(
            account.withdraw(Some(dec!(9600))),
            Err(AtmError::BelowMinimumBalance)
        );

        let receipt = account.withdraw(Some(dec!(9500))).unwrap();
        assert_eq!(receipt.new_balance, dec!(1000.00));

        // 1000 - 100 = 900 < 1000
        assert_eq!(
            account.withdraw(Some(dec!(100))),
            Err(AtmError::BelowMinimumBalance)
        );
        assert_eq!(account.balance(), dec!(1000.00));
        assert_eq!(account.transaction_count(), 2);
    }
}
