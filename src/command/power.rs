// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power and timer button commands.

use crate::command::Command;

/// Command to control device power.
///
/// # Examples
///
/// ```
/// use luefter_lib::command::{Command, PowerCommand};
///
/// assert_eq!(PowerCommand::Off.endpoint(), "?power=off");
///
/// // Toggling presses the power button on the device
/// assert_eq!(PowerCommand::Toggle.endpoint(), "?button=power");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Switch the unit on.
    On,
    /// Switch the unit off.
    Off,
    /// Press the power button.
    Toggle,
}

impl Command for PowerCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::On | Self::Off => "power",
            Self::Toggle => "button",
        }
    }

    fn value(&self) -> String {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Toggle => "power",
        }
        .to_string()
    }
}

/// Command to press the timer button.
///
/// Starts or stops the timed maximum-speed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    /// Press the timer button.
    Toggle,
}

impl Command for TimerCommand {
    fn name(&self) -> &'static str {
        "button"
    }

    fn value(&self) -> String {
        "timer".to_string()
    }
}
