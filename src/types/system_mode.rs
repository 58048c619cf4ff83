// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating modes reported in the `SystemMode` field.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Operating program of the ventilation unit.
///
/// The device reports the mode by its German name; parsing is exact and
/// case-sensitive.
///
/// # Examples
///
/// ```
/// use luefter_lib::types::SystemMode;
///
/// let mode: SystemMode = "Kellermode".parse().unwrap();
/// assert_eq!(mode, SystemMode::Kellermode);
/// assert!(mode.supports_auto());
///
/// assert!("kellermode".parse::<SystemMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SystemMode {
    /// Schedule driven operation.
    Zeitgesteuert,
    /// Cellar mode: ventilates only when outside air is drier.
    Kellermode,
    /// Comfort mode: humidity controlled.
    Behaglichkeitsmode,
}

impl SystemMode {
    /// All modes, in the order the device documents them.
    pub const ALL: [Self; 3] = [Self::Zeitgesteuert, Self::Kellermode, Self::Behaglichkeitsmode];

    /// Returns the name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zeitgesteuert => "Zeitgesteuert",
            Self::Kellermode => "Kellermode",
            Self::Behaglichkeitsmode => "Behaglichkeitsmode",
        }
    }

    /// Returns `true` if the device picks its own speed in this mode.
    ///
    /// Resetting the speed (`?speed=0`) hands control back to the mode's
    /// automatic regulation, which only exists for the humidity driven modes.
    #[must_use]
    pub const fn supports_auto(&self) -> bool {
        matches!(self, Self::Kellermode | Self::Behaglichkeitsmode)
    }
}

impl fmt::Display for SystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| ValueError::InvalidSystemMode(s.to_string()))
    }
}
