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

//! Session orchestration.
//!
//! The [`Session`] is the single entry point for a presentation layer. It
//! composes the authenticator and the account and gates every account
//! operation on the authentication state:
//!
//! - **Locked** (terminal): every operation returns [`AtmError::CardBlocked`].
//! - **Unauthenticated**: account operations return
//!   [`AtmError::NotAuthenticated`]; only `submit_pin` makes progress.
//! - **Authenticated**: operations delegate to the account.
//!
//! `logout` drops back to Unauthenticated; balance, ledger, failed-attempt
//! counter, and lock state all persist.

use crate::account::{Account, Receipt};
use crate::auth::{AuthResult, Authenticator};
use crate::error::AtmError;
use crate::ledger::Transaction;
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Default secret PIN used by [`Session::default`].
pub const DEFAULT_PIN: &str = "1234";
/// Default opening balance used by [`Session::default`].
pub const DEFAULT_OPENING_BALANCE: Decimal = dec!(10000.00);

/// One user's ATM session: an authenticator plus an account with its ledger.
///
/// The session owns both for its whole lifetime. All state lives here;
/// there is no global. A host serving multiple users creates one `Session`
/// per user and must give each operation exclusive access to it.
#[derive(Debug)]
pub struct Session {
    auth: Authenticator,
    account: Account,
}

impl Session {
    pub fn new(secret_pin: impl Into<String>, opening_balance: Decimal) -> Self {
        Self {
            auth: Authenticator::new(secret_pin),
            account: Account::new(opening_balance),
        }
    }

    /// Submits a PIN candidate. See [`Authenticator::submit_pin`] for the
    /// validation order and lockout policy.
    pub fn submit_pin(&mut self, candidate: &str) -> AuthResult {
        self.auth.submit_pin(candidate)
    }

    /// Rejects the operation unless the session is authenticated.
    fn guard(&self) -> Result<(), AtmError> {
        if self.auth.is_locked() {
            return Err(AtmError::CardBlocked);
        }
        if !self.auth.is_verified() {
            return Err(AtmError::NotAuthenticated);
        }
        Ok(())
    }

    /// Current balance.
    pub fn check_balance(&self) -> Result<Decimal, AtmError> {
        self.guard()?;
        Ok(self.account.balance())
    }

    /// Credits the account. See [`Account::deposit`] for the rules.
    pub fn deposit(&mut self, amount: Option<Decimal>) -> Result<Receipt, AtmError> {
        self.guard()?;
        self.account.deposit(amount)
    }

    /// Debits the account. See [`Account::withdraw`] for the rules.
    pub fn withdraw(&mut self, amount: Option<Decimal>) -> Result<Receipt, AtmError> {
        self.guard()?;
        self.account.withdraw(amount)
    }

    /// Most-recent-first snapshot of committed transactions.
    pub fn history(&self) -> Result<Vec<Transaction>, AtmError> {
        self.guard()?;
        Ok(self.account.history())
    }

    /// Ends the authenticated part of the session. The PIN must be entered
    /// again; balance, ledger, attempts, and lock state persist.
    pub fn logout(&mut self) {
        info!("session logged out");
        self.auth.logout();
    }

    pub fn is_locked(&self) -> bool {
        self.auth.is_locked()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_verified()
    }
}

impl Default for Session {
    /// A fresh session with the stock demo credentials and opening balance.
    fn default() -> Self {
        Self::new(DEFAULT_PIN, DEFAULT_OPENING_BALANCE)
    }
}
