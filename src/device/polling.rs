// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polling cadence and failure tolerance.

use std::time::Duration;

use crate::state::FailureTracker;

/// Polling settings of a device.
///
/// The library never polls telemetry on its own; the update interval is the
/// cadence the host is expected to call [`Device::update`](crate::Device::update)
/// with. The version poll interval drives
/// [`Device::spawn_version_poller`](crate::Device::spawn_version_poller).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use luefter_lib::PollingConfig;
///
/// let polling = PollingConfig::default()
///     .with_update_interval(Duration::from_secs(30))
///     .with_failure_threshold(5);
///
/// assert_eq!(polling.update_interval(), Duration::from_secs(30));
/// assert_eq!(polling.failure_threshold(), 5);
/// assert_eq!(polling.version_poll_interval(), Duration::from_secs(24 * 60 * 60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    update_interval: Duration,
    failure_threshold: u32,
    version_poll_interval: Duration,
}

impl PollingConfig {
    /// Default telemetry cadence.
    pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(20);

    /// Default firmware version poll cadence.
    pub const DEFAULT_VERSION_POLL_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Shortest accepted interval. Zero intervals are raised to it.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

    /// Sets the telemetry cadence suggested to the host.
    ///
    /// A zero interval is raised to [`MIN_INTERVAL`](Self::MIN_INTERVAL).
    #[must_use]
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval.max(Self::MIN_INTERVAL);
        self
    }

    /// Sets how many consecutive transport failures mark the device unavailable.
    ///
    /// A threshold of 0 is treated as 1.
    #[must_use]
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold.max(1);
        self
    }

    /// Sets the firmware version poll cadence.
    ///
    /// A zero interval is raised to [`MIN_INTERVAL`](Self::MIN_INTERVAL).
    #[must_use]
    pub fn with_version_poll_interval(mut self, interval: Duration) -> Self {
        self.version_poll_interval = interval.max(Self::MIN_INTERVAL);
        self
    }

    /// Returns the telemetry cadence.
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Returns the failure threshold.
    #[must_use]
    pub fn failure_threshold(&self) -> u32 {
        self.failure_threshold
    }

    /// Returns the firmware version poll cadence.
    #[must_use]
    pub fn version_poll_interval(&self) -> Duration {
        self.version_poll_interval
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            update_interval: Self::DEFAULT_UPDATE_INTERVAL,
            failure_threshold: FailureTracker::DEFAULT_THRESHOLD,
            version_poll_interval: Self::DEFAULT_VERSION_POLL_INTERVAL,
        }
    }
}
