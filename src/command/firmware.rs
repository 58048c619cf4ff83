// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Firmware update trigger.

use crate::command::Command;

/// Asks the device to check for, and install, new Wi-Fi firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateCheckCommand;

impl Command for UpdateCheckCommand {
    fn name(&self) -> &'static str {
        "updatecheck"
    }

    fn value(&self) -> String {
        "1".to_string()
    }
}
