// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan speed levels accepted by the ventilation unit.
//!
//! Each level type checks its range at construction so that an invalid
//! level is rejected before any request reaches the device.
//!
//! # Device Methods
//!
//! - [`FanSpeed`]: [`set_speed()`](crate::Device::set_speed)
//! - [`MotorSpeed`]: [`set_speed_in()`](crate::Device::set_speed_in) /
//!   [`set_speed_out()`](crate::Device::set_speed_out)
//! - [`AntiFreezeSpeed`]: [`set_speed_anti_freeze()`](crate::Device::set_speed_anti_freeze)

use std::fmt;

use crate::error::ValueError;

fn check_range(value: u8, min: u8, max: u8) -> Result<u8, ValueError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValueError::OutOfRange {
            min,
            max,
            actual: value,
        })
    }
}

/// Overall fan level (1-10) used while the unit runs.
///
/// # Examples
///
/// ```
/// use luefter_lib::types::FanSpeed;
///
/// let speed = FanSpeed::new(7).unwrap();
/// assert_eq!(speed.value(), 7);
///
/// assert!(FanSpeed::new(0).is_err());
/// assert!(FanSpeed::new(11).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8")]
pub struct FanSpeed(u8);

impl FanSpeed {
    /// Minimum speed level.
    pub const MIN: u8 = 1;

    /// Maximum speed level.
    pub const MAX: u8 = 10;

    /// Lowest level.
    pub const LOWEST: Self = Self(Self::MIN);

    /// Highest level.
    pub const HIGHEST: Self = Self(Self::MAX);

    /// Creates a new fan speed level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is outside [1, 10].
    pub fn new(value: u8) -> Result<Self, ValueError> {
        check_range(value, Self::MIN, Self::MAX).map(Self)
    }

    /// Creates a fan speed, clamping to the valid range.
    #[must_use]
    pub const fn clamped(value: u8) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Returns the speed level.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for FanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for FanSpeed {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Speed of a single motor (intake or exhaust), 0-10.
///
/// The device only honours these settings while it is switched off and
/// runs firmware WS32240427 or newer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8")]
pub struct MotorSpeed(u8);

impl MotorSpeed {
    /// Minimum speed level (motor stopped).
    pub const MIN: u8 = 0;

    /// Maximum speed level.
    pub const MAX: u8 = 10;

    /// Creates a new motor speed level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is greater than 10.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        check_range(value, Self::MIN, Self::MAX).map(Self)
    }

    /// Returns the speed level.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for MotorSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for MotorSpeed {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Fan level used by the anti-freeze program, 0-50.
///
/// The device UI moves this value in steps of 5, but any level in range is
/// accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u8")]
pub struct AntiFreezeSpeed(u8);

impl AntiFreezeSpeed {
    /// Minimum level.
    pub const MIN: u8 = 0;

    /// Maximum level.
    pub const MAX: u8 = 50;

    /// Creates a new anti-freeze level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value is greater than 50.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        check_range(value, Self::MIN, Self::MAX).map(Self)
    }

    /// Returns the level.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for AntiFreezeSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for AntiFreezeSpeed {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
