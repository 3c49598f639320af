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

//! PIN verification and lockout.
//!
//! Implemented state machine:
//!
//  Unauthenticated ──correct pin──► Verified
//        │ ▲
//        │ └─incorrect (attempts < 3)
//        │
//        └──3rd incorrect attempt──► Locked (terminal)

use log::{debug, warn};

/// Outcome of a single PIN submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    /// PIN matched; the session is now verified.
    Success,
    /// PIN did not match; `remaining` attempts are left before lockout.
    IncorrectPin { remaining: u8 },
    /// This submission exhausted the last attempt; the card is now blocked.
    LockedOut,
    /// The card was already blocked before this submission.
    AlreadyLocked,
    /// Candidate was not exactly 4 digits; no attempt was consumed.
    MalformedPin,
}

/// Holds the secret PIN, the failed-attempt counter, and the lock flag.
///
/// `locked` is monotonic: once set it is never cleared within the session,
/// not even by a correct PIN or a logout.
#[derive(Debug)]
pub struct Authenticator {
    secret_pin: String,
    attempts: u8,
    verified: bool,
    locked: bool,
}

impl Authenticator {
    /// Number of syntactically valid submissions before the card blocks.
    pub const MAX_ATTEMPTS: u8 = 3;

    pub fn new(secret_pin: impl Into<String>) -> Self {
        let secret_pin = secret_pin.into();
        debug_assert!(
            secret_pin.len() == 4 && secret_pin.chars().all(|c| c.is_ascii_digit()),
            "secret PIN must be exactly 4 digits, got {:?}",
            secret_pin
        );
        Self {
            secret_pin,
            attempts: 0,
            verified: false,
            locked: false,
        }
    }

    /// Validates a submitted PIN candidate.
    ///
    /// Malformed candidates (anything other than 4 digits after trimming)
    /// and submissions against a blocked card do not consume an attempt.
    /// Every other submission increments the attempt counter; the third
    /// counted miss blocks the card permanently.
    pub fn submit_pin(&mut self, candidate: &str) -> AuthResult {
        if self.locked {
            debug!("PIN submitted against blocked card, rejecting");
            return AuthResult::AlreadyLocked;
        }

        let candidate = candidate.trim();
        if candidate.len() != 4 || !candidate.chars().all(|c| c.is_ascii_digit()) {
            debug!("malformed PIN candidate, attempt not counted");
            return AuthResult::MalformedPin;
        }

        self.attempts += 1;

        if candidate == self.secret_pin {
            self.verified = true;
            debug!("PIN verified on attempt {}", self.attempts);
            return AuthResult::Success;
        }

        if self.attempts >= Self::MAX_ATTEMPTS {
            self.locked = true;
            warn!("card blocked after {} failed PIN attempts", self.attempts);
            return AuthResult::LockedOut;
        }

        let remaining = Self::MAX_ATTEMPTS - self.attempts;
        debug!("incorrect PIN, {} attempt(s) remaining", remaining);
        AuthResult::IncorrectPin { remaining }
    }

    /// Clears the verified flag. Attempt counter and lock state persist.
    pub fn logout(&mut self) {
        self.verified = false;
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}
