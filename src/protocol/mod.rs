// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport for communicating with Bayernluft devices.
//!
//! The device speaks plain HTTP GET: every read and every command is a
//! single request against a fixed endpoint relative to the device's base
//! URL. [`HttpClient`] is the reqwest based implementation of [`Protocol`].

mod http;

pub use http::{HttpClient, HttpConfig, decode_lossy, normalize_base_url};

use crate::error::ProtocolError;

/// Live JSON export (current firmware).
pub const ENDPOINT_JSON: &str = "/index.html?export=live";

/// Export layout template (legacy firmware).
pub const ENDPOINT_TEMPLATE: &str = "/export.txt";

/// Rendered text export (legacy firmware).
pub const ENDPOINT_EXPORT: &str = "?export=1";

/// Trait for transports that can issue GET requests for a device.
#[allow(async_fn_in_trait)]
pub trait Protocol {
    /// Fetches an endpoint relative to the device's base URL.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Path and/or query appended verbatim to the base URL
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Http` if the request fails, or
    /// `ProtocolError::UnexpectedStatus` for a non-success status.
    async fn fetch(&self, endpoint: &str) -> Result<String, ProtocolError>;

    /// Fetches an absolute URL, such as the firmware version server.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch).
    async fn fetch_url(&self, url: &str) -> Result<String, ProtocolError>;

    /// Returns the normalized base URL of the device.
    fn base_url(&self) -> &str;
}
