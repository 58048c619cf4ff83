// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for ventilation unit control and telemetry.
//!
//! Level types ensure values are within their valid ranges at construction
//! time, so out-of-range commands never reach the device.
//!
//! # Types
//!
//! - [`FanSpeed`] - Overall fan level (1-10)
//! - [`MotorSpeed`] - Intake or exhaust motor level (0-10)
//! - [`AntiFreezeSpeed`] - Anti-freeze program level (0-50)
//! - [`SystemMode`] - Operating program reported by the device
//! - [`UpdateTarget`] - Firmware family of the Wi-Fi module
//! - [`Value`] - A converted telemetry field

mod speed;
mod system_mode;
mod update_target;
mod value;

pub use speed::{AntiFreezeSpeed, FanSpeed, MotorSpeed};
pub use system_mode::SystemMode;
pub use update_target::UpdateTarget;
pub use value::Value;
