// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed commands.

use crate::command::Command;
use crate::types::{AntiFreezeSpeed, FanSpeed, MotorSpeed};

/// Command to change a fan level.
///
/// Intake and exhaust levels are only applied while the unit is switched
/// off, and require firmware WS32240427 or newer.
///
/// # Examples
///
/// ```
/// use luefter_lib::command::{Command, SpeedCommand};
/// use luefter_lib::types::MotorSpeed;
///
/// let cmd = SpeedCommand::Intake(MotorSpeed::new(3).unwrap());
/// assert_eq!(cmd.endpoint(), "?speedIn=3");
///
/// // Level 0 hands the speed back to the automatic program
/// assert_eq!(SpeedCommand::Reset.endpoint(), "?speed=0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedCommand {
    /// Set the overall fan level.
    Set(FanSpeed),
    /// Return to automatic speed.
    Reset,
    /// Set the intake motor level.
    Intake(MotorSpeed),
    /// Set the exhaust motor level.
    Exhaust(MotorSpeed),
    /// Set the anti-freeze program level.
    AntiFreeze(AntiFreezeSpeed),
}

impl Command for SpeedCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Set(_) | Self::Reset => "speed",
            Self::Intake(_) => "speedIn",
            Self::Exhaust(_) => "speedOut",
            Self::AntiFreeze(_) => "speedFrM",
        }
    }

    fn value(&self) -> String {
        match self {
            Self::Set(level) => level.to_string(),
            Self::Reset => "0".to_string(),
            Self::Intake(level) | Self::Exhaust(level) => level.to_string(),
            Self::AntiFreeze(level) => level.to_string(),
        }
    }
}
