// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed telemetry values.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use super::SystemMode;

/// A telemetry field converted to its native type.
///
/// Produced by [`convert`](crate::telemetry::convert). Fields without a
/// dedicated conversion are kept as [`Value::Text`].
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Status flag (`"1"` is on, anything else off).
    Bool(bool),
    /// Whole number such as a speed level or signal strength.
    Integer(i64),
    /// Decimal measurement such as a temperature.
    Float(f64),
    /// Device date.
    Date(NaiveDate),
    /// Device time of day.
    Time(NaiveTime),
    /// Operating program.
    SystemMode(SystemMode),
    /// Unconverted text.
    Text(String),
}

impl Value {
    /// Returns the flag value, if this is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`Value::Integer`].
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number, if this is a [`Value::Float`] or [`Value::Integer`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the date, if this is a [`Value::Date`].
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the time, if this is a [`Value::Time`].
    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns the mode, if this is a [`Value::SystemMode`].
    #[must_use]
    pub fn as_system_mode(&self) -> Option<SystemMode> {
        match self {
            Self::SystemMode(m) => Some(*m),
            _ => None,
        }
    }

    /// Returns the text, if this is a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Self::SystemMode(m) => write!(f, "{m}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}
