// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for the JSON live export of current firmware.

use serde_json::Value as JsonValue;

use super::{RawFields, canonical_field_name};
use crate::error::ParseError;

/// Parses the body of `/index.html?export=live` into raw fields.
///
/// The device reports every value as a string; other JSON scalars are kept
/// as their JSON text and `null` becomes an empty string.
///
/// # Errors
///
/// Returns `ParseError::Json` if the body is not JSON, or
/// `ParseError::UnexpectedFormat` if it is not a JSON object.
///
/// # Examples
///
/// ```
/// use luefter_lib::telemetry::parse_json;
///
/// let fields = parse_json(r#"{"Temp_In":"21,3","_SystemOn":"1"}"#).unwrap();
/// assert_eq!(fields["Temp_In"], "21,3");
/// assert_eq!(fields["SystemOn"], "1");
/// ```
pub fn parse_json(body: &str) -> Result<RawFields, ParseError> {
    let JsonValue::Object(object) = serde_json::from_str::<JsonValue>(body)? else {
        return Err(ParseError::UnexpectedFormat(
            "live export is not a JSON object".to_string(),
        ));
    };

    Ok(object
        .into_iter()
        .map(|(key, value)| (canonical_field_name(&key).to_string(), raw_string(value)))
        .collect())
}

fn raw_string(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
