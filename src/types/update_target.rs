// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Firmware families of the Wi-Fi module.

use std::fmt;

/// Firmware family of the device's Wi-Fi module.
///
/// Each family is published separately on the firmware server, so the
/// client must know which one the device runs before it can report the
/// latest available version.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum UpdateTarget {
    /// Original Wi-Fi module.
    Wlan,
    /// ESP32 based Wi-Fi module, paired with `Rev2.x` main controllers.
    Wlan32,
}

impl UpdateTarget {
    /// All firmware families.
    pub const ALL: [Self; 2] = [Self::Wlan, Self::Wlan32];

    /// Main controller version prefix that identifies a [`Wlan32`](Self::Wlan32) device.
    pub const WLAN32_CONTROLLER_PREFIX: &'static str = "Rev2.";

    /// Infers the family from the `FW_MainController` field.
    ///
    /// # Examples
    ///
    /// ```
    /// use luefter_lib::types::UpdateTarget;
    ///
    /// assert_eq!(UpdateTarget::from_main_controller(Some("Rev2.1")), UpdateTarget::Wlan32);
    /// assert_eq!(UpdateTarget::from_main_controller(Some("Rev1.4")), UpdateTarget::Wlan);
    /// assert_eq!(UpdateTarget::from_main_controller(None), UpdateTarget::Wlan);
    /// ```
    #[must_use]
    pub fn from_main_controller(version: Option<&str>) -> Self {
        match version {
            Some(v) if v.starts_with(Self::WLAN32_CONTROLLER_PREFIX) => Self::Wlan32,
            _ => Self::Wlan,
        }
    }

    /// Returns the family name used in the firmware server paths.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wlan => "wlan",
            Self::Wlan32 => "wlan32",
        }
    }

    /// Path of the plain-text latest version file on the firmware server.
    #[must_use]
    pub const fn version_path(&self) -> &'static str {
        match self {
            Self::Wlan => "/de/download/wlan/version.txt",
            Self::Wlan32 => "/de/download/wlan32/version.txt",
        }
    }

    /// Path of the release notes page on the firmware server.
    #[must_use]
    pub const fn release_notes_path(&self) -> &'static str {
        match self {
            Self::Wlan => "/de/wlan_changelist.html",
            Self::Wlan32 => "/de/wlan32_changelist.html",
        }
    }
}

impl fmt::Display for UpdateTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
