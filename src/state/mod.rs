// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceSnapshot`] holds the raw and converted telemetry of the last
//! successful poll. [`FailureTracker`] counts failed polls and decides when
//! the device is reported unavailable.

mod health;
mod snapshot;

pub use health::{ConnectionState, FailureTracker, FailureVerdict};
pub use snapshot::DeviceSnapshot;
