// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for the template driven text export of legacy firmware.
//!
//! Legacy devices serve their export layout at `/export.txt`. Every field
//! appears there as a marker `~Name~`; everything else is fixed text. The
//! rendered export (`?export=1`) follows the same layout, with each marker
//! either echoed in front of its value or replaced by it. Field values never
//! contain the reserved `~` character.

use std::sync::LazyLock;

use regex::Regex;

use super::{RawFields, canonical_field_name};
use crate::error::ParseError;

// Constant pattern. Compiled by the `marker_pattern_compiles` test.
static MARKER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~([A-Za-z0-9_]+)~").expect("marker pattern is valid"));

/// A compiled export template.
///
/// # Examples
///
/// ```
/// use luefter_lib::telemetry::ExportTemplate;
///
/// let template = ExportTemplate::compile("~Date~~Time~~").unwrap();
/// let fields = template.extract("~Date~01.03.2023~Time~12:00:00~").unwrap();
///
/// assert_eq!(fields["Date"], "01.03.2023");
/// assert_eq!(fields["Time"], "12:00:00");
/// ```
#[derive(Debug, Clone)]
pub struct ExportTemplate {
    pattern: Regex,
    /// Canonical field names, in capture group order.
    fields: Vec<String>,
}

impl ExportTemplate {
    /// Compiles a template fetched from the device.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidTemplate` if the template contains no
    /// field marker or names the same field twice.
    pub fn compile(template: &str) -> Result<Self, ParseError> {
        let template = normalize_text(template);
        let mut pattern = String::from("^");
        let mut fields: Vec<String> = Vec::new();
        let mut literal_start = 0;

        for captures in MARKER_PATTERN.captures_iter(&template) {
            let (Some(marker), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let name = canonical_field_name(name.as_str());
            if fields.iter().any(|f| f == name) {
                return Err(ParseError::InvalidTemplate(format!(
                    "field {name} appears more than once"
                )));
            }

            pattern.push_str(&regex::escape(&template[literal_start..marker.start()]));
            pattern.push_str("(?:");
            pattern.push_str(&regex::escape(marker.as_str()));
            pattern.push_str(")?([^~]*)");

            fields.push(name.to_string());
            literal_start = marker.end();
        }

        if fields.is_empty() {
            return Err(ParseError::InvalidTemplate(
                "template contains no field markers".to_string(),
            ));
        }

        pattern.push_str(&regex::escape(&template[literal_start..]));
        pattern.push('$');

        let pattern =
            Regex::new(&pattern).map_err(|e| ParseError::InvalidTemplate(e.to_string()))?;

        tracing::debug!(fields = fields.len(), "Compiled export template");

        Ok(Self { pattern, fields })
    }

    /// Returns the canonical names of the fields in this template.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Extracts the fields from a rendered export.
    ///
    /// Returns `None` if the export does not follow this template, which
    /// means the device changed its export layout.
    #[must_use]
    pub fn extract(&self, export: &str) -> Option<RawFields> {
        let export = normalize_text(export);
        let captures = self.pattern.captures(&export)?;

        Some(
            self.fields
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = captures.get(i + 1).map_or("", |m| m.as_str());
                    (name.clone(), value.to_string())
                })
                .collect(),
        )
    }
}

fn normalize_text(text: &str) -> String {
    text.trim().replace("\r\n", "\n")
}
