// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telemetry parsing for Bayernluft ventilation units.
//!
//! Two firmware generations export their state differently:
//!
//! - Current firmware serves a JSON object at `/index.html?export=live`
//!   ([`WireFormat::Json`]).
//! - Legacy firmware serves a layout template at `/export.txt` and the
//!   rendered export at `?export=1` ([`WireFormat::Template`]).
//!
//! Both produce the same [`RawFields`] with canonical field names, which
//! [`convert_all`] then turns into typed values.
//!
//! # Examples
//!
//! ```
//! use luefter_lib::telemetry::{ParseOutcome, ResponseParser, WireFormat, convert_all};
//! use luefter_lib::types::Value;
//!
//! let mut parser = ResponseParser::new(WireFormat::Json);
//! let ParseOutcome::Fields(raw) = parser.parse(r#"{"Temp_Out":"4,5"}"#).unwrap() else {
//!     unreachable!()
//! };
//! let converted = convert_all(&raw);
//! assert_eq!(converted["Temp_Out"], Some(Value::Float(4.5)));
//! ```

mod convert;
mod json_parser;
mod template_parser;

pub use convert::{Conversion, ConvertedFields, convert, convert_all, to_bool, to_float};
pub use json_parser::parse_json;
pub use template_parser::ExportTemplate;

use std::collections::BTreeMap;

use crate::error::ParseError;

/// Raw telemetry: canonical field name to the string the device sent.
pub type RawFields = BTreeMap<String, String>;

/// Prefix legacy firmware puts in front of status field names.
pub const LEGACY_FIELD_PREFIX: char = '_';

/// Returns the canonical name of a field.
///
/// Legacy firmware names status fields with a leading underscore
/// (`_SystemOn`); current firmware does not (`SystemOn`).
///
/// # Examples
///
/// ```
/// use luefter_lib::telemetry::canonical_field_name;
///
/// assert_eq!(canonical_field_name("_SystemOn"), "SystemOn");
/// assert_eq!(canonical_field_name("SystemOn"), "SystemOn");
/// ```
#[must_use]
pub fn canonical_field_name(name: &str) -> &str {
    name.strip_prefix(LEGACY_FIELD_PREFIX).unwrap_or(name)
}

/// Wire format spoken by the device's firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WireFormat {
    /// JSON live export (current firmware).
    #[default]
    Json,
    /// Template driven text export (legacy firmware).
    Template,
}

/// Result of parsing one telemetry body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The body was parsed.
    Fields(RawFields),
    /// The export no longer follows the cached template. The template has
    /// been dropped and must be fetched again.
    TemplateDrift,
}

/// Telemetry parser for one device, tagged by wire format.
///
/// The template strategy owns the compiled template; it is empty until
/// [`set_template`](Self::set_template) is called and again after drift.
#[derive(Debug, Clone)]
pub enum ResponseParser {
    /// JSON strategy.
    Json,
    /// Template strategy with the cached template, if loaded.
    Template(Option<ExportTemplate>),
}

impl ResponseParser {
    /// Creates a parser for the given wire format.
    #[must_use]
    pub fn new(format: WireFormat) -> Self {
        match format {
            WireFormat::Json => Self::Json,
            WireFormat::Template => Self::Template(None),
        }
    }

    /// Returns the wire format of this parser.
    #[must_use]
    pub fn wire_format(&self) -> WireFormat {
        match self {
            Self::Json => WireFormat::Json,
            Self::Template(_) => WireFormat::Template,
        }
    }

    /// Returns `true` if a template must be fetched before parsing.
    #[must_use]
    pub fn needs_template(&self) -> bool {
        matches!(self, Self::Template(None))
    }

    /// Caches a compiled template. Ignored by the JSON strategy.
    pub fn set_template(&mut self, template: ExportTemplate) {
        if let Self::Template(slot) = self {
            *slot = Some(template);
        }
    }

    /// Drops the cached template so it is fetched again.
    pub fn invalidate_template(&mut self) {
        if let Self::Template(slot) = self {
            *slot = None;
        }
    }

    /// Parses a telemetry body.
    ///
    /// With the template strategy, an export that does not match the cached
    /// template invalidates it and yields [`ParseOutcome::TemplateDrift`].
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if a JSON body is malformed, or if the template
    /// strategy has no template loaded.
    pub fn parse(&mut self, body: &str) -> Result<ParseOutcome, ParseError> {
        match self {
            Self::Json => parse_json(body).map(ParseOutcome::Fields),
            Self::Template(slot) => {
                let template = slot.as_ref().ok_or_else(|| {
                    ParseError::UnexpectedFormat("export template not loaded".to_string())
                })?;
                match template.extract(body) {
                    Some(fields) => Ok(ParseOutcome::Fields(fields)),
                    None => {
                        *slot = None;
                        Ok(ParseOutcome::TemplateDrift)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_parser_never_needs_template() {
        let parser = ResponseParser::new(WireFormat::Json);
        assert!(!parser.needs_template());
        assert_eq!(parser.wire_format(), WireFormat::Json);
    }

    #[test]
    fn template_parser_without_template_errors() {
        let mut parser = ResponseParser::new(WireFormat::Template);
        assert!(parser.needs_template());
        assert!(parser.parse("anything").is_err());
    }

    #[test]
    fn template_drift_invalidates_template() {
        let mut parser = ResponseParser::new(WireFormat::Template);
        parser.set_template(ExportTemplate::compile("~Date~~Time~~").unwrap());
        assert!(!parser.needs_template());

        let outcome = parser.parse("~Date~01.03.2023~Time~12:00:00~").unwrap();
        assert!(matches!(outcome, ParseOutcome::Fields(ref f) if f.len() == 2));

        let outcome = parser.parse("~Datum~01.03.2023~").unwrap();
        assert_eq!(outcome, ParseOutcome::TemplateDrift);
        assert!(parser.needs_template());
    }

    #[test]
    fn both_formats_share_canonical_names() {
        let mut json = ResponseParser::new(WireFormat::Json);
        let mut template = ResponseParser::new(WireFormat::Template);
        template.set_template(ExportTemplate::compile("~_SystemOn~;~Temp_In~").unwrap());

        let ParseOutcome::Fields(from_json) =
            json.parse(r#"{"SystemOn":"1","Temp_In":"20,0"}"#).unwrap()
        else {
            panic!("expected fields");
        };
        let ParseOutcome::Fields(from_template) = template.parse("1;20,0").unwrap() else {
            panic!("expected fields");
        };
        assert_eq!(from_json, from_template);
    }
}
