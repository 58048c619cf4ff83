// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last known device state.

use chrono::{NaiveDate, NaiveTime};

use crate::telemetry::{ConvertedFields, RawFields, convert_all};
use crate::types::{SystemMode, Value};

/// Raw and converted telemetry from one successful poll.
///
/// Both maps always have the same keys. A snapshot is immutable; the
/// device client swaps in a new one after every successful poll.
///
/// # Examples
///
/// ```
/// use luefter_lib::state::DeviceSnapshot;
/// use luefter_lib::telemetry::RawFields;
///
/// let mut raw = RawFields::new();
/// raw.insert("SystemOn".to_string(), "1".to_string());
/// raw.insert("Temp_In".to_string(), "N/A".to_string());
///
/// let snapshot = DeviceSnapshot::from_raw(raw);
/// assert_eq!(snapshot.is_on(), Some(true));
/// assert_eq!(snapshot.temperature_in(), None);
/// assert!(snapshot.contains("Temp_In"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DeviceSnapshot {
    raw: RawFields,
    converted: ConvertedFields,
}

impl DeviceSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot by converting every raw field.
    #[must_use]
    pub fn from_raw(raw: RawFields) -> Self {
        let converted = convert_all(&raw);
        Self { raw, converted }
    }

    /// Returns the raw field strings.
    #[must_use]
    pub fn raw(&self) -> &RawFields {
        &self.raw
    }

    /// Returns the converted fields.
    #[must_use]
    pub fn converted(&self) -> &ConvertedFields {
        &self.converted
    }

    /// Returns `true` if no field is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the device reported this field.
    ///
    /// A reported field may still have no converted value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.raw.contains_key(name)
    }

    /// Returns the raw string of a field.
    #[must_use]
    pub fn get_raw(&self, name: &str) -> Option<&str> {
        self.raw.get(name).map(String::as_str)
    }

    /// Returns the converted value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.converted.get(name).and_then(Option::as_ref)
    }

    // ========== Identity ==========

    /// Device name configured on the unit.
    #[must_use]
    pub fn device_name(&self) -> Option<&str> {
        self.get_raw("DeviceName")
    }

    /// MAC address of the Wi-Fi module.
    #[must_use]
    pub fn mac(&self) -> Option<&str> {
        self.get_raw("MAC")
    }

    /// IP address the device reports for itself.
    #[must_use]
    pub fn local_ip(&self) -> Option<&str> {
        self.get_raw("LocalIP")
    }

    /// Main controller firmware version.
    #[must_use]
    pub fn main_controller_version(&self) -> Option<&str> {
        self.get_raw("FW_MainController")
    }

    /// Wi-Fi module firmware version.
    #[must_use]
    pub fn wifi_version(&self) -> Option<&str> {
        self.get_raw("FW_WiFi")
    }

    // ========== Status ==========

    /// Whether the unit is switched on.
    #[must_use]
    pub fn is_on(&self) -> Option<bool> {
        self.get("SystemOn").and_then(Value::as_bool)
    }

    /// Current operating program.
    #[must_use]
    pub fn system_mode(&self) -> Option<SystemMode> {
        self.get("SystemMode").and_then(Value::as_system_mode)
    }

    /// Whether the timed maximum-speed run is active.
    #[must_use]
    pub fn is_timer_active(&self) -> Option<bool> {
        self.get("TimerActiv").and_then(Value::as_bool)
    }

    /// Whether anti-freeze protection is active.
    #[must_use]
    pub fn is_frost_protection_active(&self) -> Option<bool> {
        self.get("FrostschutzAktiv").and_then(Value::as_bool)
    }

    /// Device date.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.get("Date").and_then(Value::as_date)
    }

    /// Device time of day.
    #[must_use]
    pub fn time(&self) -> Option<NaiveTime> {
        self.get("Time").and_then(Value::as_time)
    }

    // ========== Fans ==========

    /// Intake motor level.
    #[must_use]
    pub fn speed_in(&self) -> Option<i64> {
        self.get("Speed_In").and_then(Value::as_integer)
    }

    /// Exhaust motor level.
    #[must_use]
    pub fn speed_out(&self) -> Option<i64> {
        self.get("Speed_Out").and_then(Value::as_integer)
    }

    /// Anti-freeze program level.
    #[must_use]
    pub fn speed_anti_freeze(&self) -> Option<i64> {
        self.get("Speed_AntiFreeze").and_then(Value::as_integer)
    }

    // ========== Climate ==========

    /// Indoor air temperature in °C.
    #[must_use]
    pub fn temperature_in(&self) -> Option<f64> {
        self.get("Temp_In").and_then(Value::as_float)
    }

    /// Outdoor air temperature in °C.
    #[must_use]
    pub fn temperature_out(&self) -> Option<f64> {
        self.get("Temp_Out").and_then(Value::as_float)
    }

    /// Supply air temperature in °C.
    #[must_use]
    pub fn temperature_fresh(&self) -> Option<f64> {
        self.get("Temp_Fresh").and_then(Value::as_float)
    }

    /// Indoor relative humidity in %.
    #[must_use]
    pub fn humidity_in(&self) -> Option<f64> {
        self.get("rel_Humidity_In").and_then(Value::as_float)
    }

    /// Outdoor relative humidity in %.
    #[must_use]
    pub fn humidity_out(&self) -> Option<f64> {
        self.get("rel_Humidity_Out").and_then(Value::as_float)
    }

    /// Heat recovery efficiency in %.
    #[must_use]
    pub fn efficiency(&self) -> Option<f64> {
        self.get("Efficiency").and_then(Value::as_float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DeviceSnapshot {
        let raw: RawFields = [
            ("DeviceName", "Bad"),
            ("FW_WiFi", "WS32240427"),
            ("SystemOn", "0"),
            ("SystemMode", "Kellermode"),
            ("Speed_Out", "6"),
            ("Temp_Out", "-1,5"),
            ("Efficiency", "N/A"),
            ("Date", "31.12.2024"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        DeviceSnapshot::from_raw(raw)
    }

    #[test]
    fn new_is_empty() {
        let snapshot = DeviceSnapshot::new();
        assert!(snapshot.is_empty());
        assert!(snapshot.converted().is_empty());
    }

    #[test]
    fn key_sets_match() {
        let snapshot = sample();
        assert_eq!(snapshot.len(), 8);
        assert!(snapshot.raw().keys().eq(snapshot.converted().keys()));
    }

    #[test]
    fn typed_accessors() {
        let snapshot = sample();
        assert_eq!(snapshot.device_name(), Some("Bad"));
        assert_eq!(snapshot.wifi_version(), Some("WS32240427"));
        assert_eq!(snapshot.is_on(), Some(false));
        assert_eq!(snapshot.system_mode(), Some(SystemMode::Kellermode));
        assert_eq!(snapshot.speed_out(), Some(6));
        assert_eq!(snapshot.temperature_out(), Some(-1.5));
        assert_eq!(snapshot.date(), NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn unavailable_value_is_still_reported() {
        let snapshot = sample();
        assert!(snapshot.contains("Efficiency"));
        assert_eq!(snapshot.get_raw("Efficiency"), Some("N/A"));
        assert_eq!(snapshot.efficiency(), None);
    }

    #[test]
    fn missing_field() {
        let snapshot = sample();
        assert!(!snapshot.contains("Temp_In"));
        assert_eq!(snapshot.temperature_in(), None);
    }
}
