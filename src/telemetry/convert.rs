// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of raw telemetry strings to typed values.
//!
//! The conversion applied to a field is chosen by its canonical name from a
//! static table. Names missing from the table keep their text unchanged.
//! A conversion that fails never produces an error: the field becomes
//! `None` and the remaining fields are unaffected.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use super::RawFields;
use crate::types::{SystemMode, Value};

/// Converted telemetry: field name to typed value, `None` when unavailable.
pub type ConvertedFields = BTreeMap<String, Option<Value>>;

/// Sentinel the device sends for sensors that have no reading.
const NOT_AVAILABLE: &str = "N/A";

/// Kind of conversion applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Decimal with comma separator, `N/A` is absent.
    Float,
    /// Base-10 integer.
    Integer,
    /// `"1"` is true, anything else false.
    Bool,
    /// `dd.mm.yyyy`.
    Date,
    /// `hh:mm:ss`.
    Time,
    /// One of the [`SystemMode`] names.
    SystemMode,
    /// Unchanged text.
    Text,
}

const FIELD_CONVERSIONS: &[(&str, Conversion)] = &[
    ("Date", Conversion::Date),
    ("Time", Conversion::Time),
    ("RSSI", Conversion::Integer),
    ("SystemMode", Conversion::SystemMode),
    ("Speed_In", Conversion::Integer),
    ("Speed_Out", Conversion::Integer),
    ("Speed_AntiFreeze", Conversion::Integer),
    ("Temp_In", Conversion::Float),
    ("Temp_Out", Conversion::Float),
    ("Temp_Fresh", Conversion::Float),
    ("rel_Humidity_In", Conversion::Float),
    ("rel_Humidity_Out", Conversion::Float),
    ("abs_Humidity_In", Conversion::Float),
    ("abs_Humidity_Out", Conversion::Float),
    ("Efficiency", Conversion::Float),
    ("Humidity_Transport", Conversion::Integer),
    ("SystemOn", Conversion::Bool),
    ("FrostschutzAktiv", Conversion::Bool),
    ("SpeedFrozen", Conversion::Bool),
    ("AbtauMode", Conversion::Bool),
    ("TimerActiv", Conversion::Bool),
    ("VermieterMode", Conversion::Bool),
    ("QuerlueftungAktiv", Conversion::Bool),
    ("MaxMode", Conversion::Bool),
    ("Frozen", Conversion::Bool),
];

impl Conversion {
    /// Looks up the conversion for a canonical field name.
    ///
    /// # Examples
    ///
    /// ```
    /// use luefter_lib::telemetry::Conversion;
    ///
    /// assert_eq!(Conversion::for_field("Temp_In"), Conversion::Float);
    /// assert_eq!(Conversion::for_field("DeviceName"), Conversion::Text);
    /// ```
    #[must_use]
    pub fn for_field(name: &str) -> Self {
        FIELD_CONVERSIONS
            .iter()
            .find(|(field, _)| *field == name)
            .map_or(Self::Text, |(_, conversion)| *conversion)
    }

    /// Applies this conversion to a raw value.
    ///
    /// Returns `None` if the value does not follow the conversion's format.
    #[must_use]
    pub fn apply(self, raw: &str) -> Option<Value> {
        match self {
            Self::Float => to_float(raw).map(Value::Float),
            Self::Integer => raw.trim().parse().ok().map(Value::Integer),
            Self::Bool => Some(Value::Bool(to_bool(raw))),
            Self::Date => NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y")
                .ok()
                .map(Value::Date),
            Self::Time => NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S")
                .ok()
                .map(Value::Time),
            Self::SystemMode => raw.parse::<SystemMode>().ok().map(Value::SystemMode),
            Self::Text => Some(Value::Text(raw.to_string())),
        }
    }
}

/// Parses a decimal that may use a comma as decimal separator.
///
/// The `N/A` sentinel yields `None`.
#[must_use]
pub fn to_float(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw == NOT_AVAILABLE {
        return None;
    }
    raw.replace(',', ".").parse().ok()
}

/// Device flag semantics: only the exact string `"1"` is true.
#[must_use]
pub fn to_bool(raw: &str) -> bool {
    raw == "1"
}

/// Converts a single field by name.
///
/// # Examples
///
/// ```
/// use luefter_lib::telemetry::convert;
/// use luefter_lib::types::Value;
///
/// assert_eq!(convert("Temp_In", "21,5"), Some(Value::Float(21.5)));
/// assert_eq!(convert("Temp_In", "N/A"), None);
/// assert_eq!(convert("SystemOn", "1"), Some(Value::Bool(true)));
/// assert_eq!(convert("DeviceName", "Bad"), Some(Value::Text("Bad".to_string())));
/// ```
#[must_use]
pub fn convert(name: &str, raw: &str) -> Option<Value> {
    let converted = Conversion::for_field(name).apply(raw);
    if converted.is_none() {
        tracing::trace!(field = name, raw, "Value did not convert");
    }
    converted
}

/// Converts every field, keeping the key set of `raw`.
#[must_use]
pub fn convert_all(raw: &RawFields) -> ConvertedFields {
    raw.iter()
        .map(|(name, value)| (name.clone(), convert(name, value)))
        .collect()
}
