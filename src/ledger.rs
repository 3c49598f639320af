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

//! Append-only transaction ledger.
//!
//! Entries are stored in commit order and never edited or removed.
//! History views are reverse-chronological snapshots.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// Direction of a committed balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "Deposit"),
            TransactionKind::Withdrawal => write!(f, "Withdrawal"),
        }
    }
}

/// A committed ledger entry. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub time: DateTime<Utc>,
}

impl Serialize for Transaction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Transaction", 3)?;
        state.serialize_field("kind", &self.kind.to_string())?;
        // Always two decimal places, so whole amounts render as "500.00"
        state.serialize_field("amount", &format!("{:.2}", self.amount))?;
        state.serialize_field("time", &self.time.format("%Y-%m-%d %H:%M:%S").to_string())?;
        state.end()
    }
}

/// Ordered record of committed transactions.
///
/// Storage order is chronological; [`Ledger::history`] reverses it so the
/// most recent entry comes first.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry stamped with the current time.
    pub fn record(&mut self, kind: TransactionKind, amount: Decimal) {
        self.entries.push(Transaction {
            kind,
            amount,
            time: Utc::now(),
        });
    }

    /// Returns a most-recent-first snapshot of all entries.
    ///
    /// The snapshot is detached: later commits do not alter it.
    pub fn history(&self) -> Vec<Transaction> {
        self.entries.iter().rev().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
