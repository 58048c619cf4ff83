// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection health tracking for state polls.

use std::fmt;

/// Availability of the device as seen by state polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No poll has succeeded yet.
    #[default]
    Uninitialized,
    /// The last poll succeeded, or recent failures are below the threshold.
    Ready,
    /// Consecutive failures reached the threshold.
    Degraded,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Degraded => "degraded",
        })
    }
}

/// What a failed poll means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureVerdict {
    /// Below the threshold: keep the last snapshot, do not report.
    Transient {
        /// Consecutive failures so far.
        consecutive_failures: u32,
    },
    /// At or above the threshold: report the device as unavailable.
    Unavailable {
        /// Consecutive failures so far.
        consecutive_failures: u32,
    },
}

/// Counts consecutive transport failures of state polls.
///
/// # Examples
///
/// ```
/// use luefter_lib::state::{ConnectionState, FailureTracker, FailureVerdict};
///
/// let mut tracker = FailureTracker::new(2);
/// tracker.record_success();
/// assert!(matches!(tracker.record_failure(), FailureVerdict::Transient { .. }));
/// assert!(matches!(tracker.record_failure(), FailureVerdict::Unavailable { .. }));
/// assert_eq!(tracker.state(), ConnectionState::Degraded);
/// ```
#[derive(Debug, Clone)]
pub struct FailureTracker {
    threshold: u32,
    consecutive_failures: u32,
    state: ConnectionState,
}

impl FailureTracker {
    /// Default number of consecutive failures before the device is degraded.
    pub const DEFAULT_THRESHOLD: u32 = 3;

    /// Creates a tracker. A threshold of 0 is treated as 1.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive_failures: 0,
            state: ConnectionState::Uninitialized,
        }
    }

    /// Returns the failure threshold.
    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Returns the number of consecutive failures.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Records a successful poll and returns the previous state.
    pub fn record_success(&mut self) -> ConnectionState {
        self.consecutive_failures = 0;
        std::mem::replace(&mut self.state, ConnectionState::Ready)
    }

    /// Records a transport failure.
    pub fn record_failure(&mut self) -> FailureVerdict {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let consecutive_failures = self.consecutive_failures;
        if consecutive_failures >= self.threshold {
            self.state = ConnectionState::Degraded;
            FailureVerdict::Unavailable {
                consecutive_failures,
            }
        } else {
            FailureVerdict::Transient {
                consecutive_failures,
            }
        }
    }
}

impl Default for FailureTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
