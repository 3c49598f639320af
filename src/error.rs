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

//! Error types for session operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Session operation errors.
///
/// Every failure the core can produce is one of these variants; nothing is
/// raised to the caller as a panic. Each message names the single rule that
/// was broken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtmError {
    /// Amount field is missing for deposit or withdrawal
    #[error("please enter an amount")]
    MissingAmount,

    /// Amount is zero, negative, or not a number
    #[error("invalid amount (must be positive)")]
    InvalidAmount,

    /// Amount is above the per-transaction limit
    #[error("transaction limit exceeded (max {limit} per transaction)")]
    LimitExceeded { limit: Decimal },

    /// Withdrawal amount is not a multiple of 100
    #[error("amount must be in multiples of 100")]
    NotMultipleOfHundred,

    /// Withdrawal would exceed the current balance
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Withdrawal would leave the balance under the minimum floor
    #[error("minimum balance of 1000 must be maintained")]
    BelowMinimumBalance,

    /// Card is blocked after too many failed PIN attempts (terminal)
    #[error("card blocked, please contact bank")]
    CardBlocked,

    /// Operation requires a verified PIN
    #[error("PIN verification required")]
    NotAuthenticated,
}
