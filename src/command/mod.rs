// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bayernluft command definitions.
//!
//! Every command is a single HTTP GET whose query string carries the whole
//! instruction. The device answers with its HTML page, which is ignored.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Endpoint |
//! |-------------|---------|----------|
//! | [`PowerCommand`] | Switch the unit on/off or press the power button | `?power=on`, `?button=power` |
//! | [`TimerCommand`] | Press the timer button | `?button=timer` |
//! | [`SpeedCommand`] | Fan, motor and anti-freeze levels | `?speed=5`, `?speedIn=3` |
//! | [`UpdateCheckCommand`] | Ask the device to look for new firmware | `?updatecheck=1` |
//!
//! # Examples
//!
//! ```
//! use luefter_lib::command::{Command, PowerCommand, SpeedCommand};
//! use luefter_lib::types::FanSpeed;
//!
//! assert_eq!(PowerCommand::On.endpoint(), "?power=on");
//!
//! let cmd = SpeedCommand::Set(FanSpeed::new(5).unwrap());
//! assert_eq!(cmd.endpoint(), "?speed=5");
//! ```

mod firmware;
mod power;
mod speed;

pub use firmware::UpdateCheckCommand;
pub use power::{PowerCommand, TimerCommand};
pub use speed::SpeedCommand;

/// A command that can be sent to a ventilation unit.
pub trait Command {
    /// Returns the query parameter name, for example `"power"` or `"speedIn"`.
    fn name(&self) -> &'static str;

    /// Returns the query parameter value, for example `"on"` or `"5"`.
    fn value(&self) -> String;

    /// Returns the endpoint appended to the device's base URL.
    ///
    /// Format: `?<name>=<value>`.
    fn endpoint(&self) -> String {
        format!("?{}={}", self.name(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AntiFreezeSpeed, FanSpeed, MotorSpeed};

    #[test]
    fn endpoints_follow_firmware_contract() {
        let cases: Vec<(Box<dyn Command>, &str)> = vec![
            (Box::new(PowerCommand::On), "?power=on"),
            (Box::new(PowerCommand::Off), "?power=off"),
            (Box::new(PowerCommand::Toggle), "?button=power"),
            (Box::new(TimerCommand::Toggle), "?button=timer"),
            (Box::new(SpeedCommand::Reset), "?speed=0"),
            (
                Box::new(SpeedCommand::Set(FanSpeed::new(10).unwrap())),
                "?speed=10",
            ),
            (
                Box::new(SpeedCommand::Intake(MotorSpeed::new(0).unwrap())),
                "?speedIn=0",
            ),
            (
                Box::new(SpeedCommand::Exhaust(MotorSpeed::new(7).unwrap())),
                "?speedOut=7",
            ),
            (
                Box::new(SpeedCommand::AntiFreeze(AntiFreezeSpeed::new(35).unwrap())),
                "?speedFrM=35",
            ),
            (Box::new(UpdateCheckCommand), "?updatecheck=1"),
        ];

        for (cmd, expected) in cases {
            assert_eq!(cmd.endpoint(), expected);
        }
    }
}
