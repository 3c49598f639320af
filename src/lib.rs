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

//! # ATM Demo
//!
//! This library provides a single-user ATM session core: PIN verification
//! with a three-strike lockout, rule-gated deposits and withdrawals, and an
//! append-only transaction ledger.
//!
//! ## Core Components
//!
//! - [`Session`]: State machine facade the presentation layer talks to
//! - [`Authenticator`]: PIN verification, attempt counting, lockout
//! - [`Account`]: Balance plus ledger, mutated atomically
//! - [`AtmError`]: Typed failures for every rejected operation
//!
//! ## Example
//!
//! ```
//! use atm_demo_rs::{AuthResult, Session};
//! use rust_decimal_macros::dec;
//!
//! let mut session = Session::default();
//!
//! // Verify the PIN
//! assert_eq!(session.submit_pin("1234"), AuthResult::Success);
//!
//! // Deposit and check the balance
//! let receipt = session.deposit(Some(dec!(500.00))).unwrap();
//! assert_eq!(receipt.new_balance, dec!(10500.00));
//! assert_eq!(session.check_balance().unwrap(), dec!(10500.00));
//! ```
//!
//! ## Failure Model
//!
//! Nothing is ever raised to the caller: every rejection is a typed
//! [`AtmError`] or [`AuthResult`] value, and a rejected operation mutates
//! no state (except the failed-attempt counter on an incorrect PIN).

pub mod account;
mod auth;
pub mod error;
mod ledger;
mod session;

pub use account::{Account, Receipt, DEPOSIT_LIMIT, MIN_BALANCE, WITHDRAW_LIMIT, WITHDRAW_STEP};
pub use auth::{AuthResult, Authenticator};
pub use error::AtmError;
pub use ledger::{Ledger, Transaction, TransactionKind};
pub use session::{Session, DEFAULT_OPENING_BALANCE, DEFAULT_PIN};
