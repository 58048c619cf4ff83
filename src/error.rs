// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `luefter_lib` library.
//!
//! Failures are split the same way the device client reacts to them:
//! value validation (rejected before any request), transport and status
//! failures, body parsing, and the "device unavailable" condition raised once
//! too many consecutive polls failed.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A command argument failed validation. No request was sent.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// A request failed or the device answered with an unexpected status.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The response body could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The device failed to answer too many consecutive state polls.
    #[error("device unavailable after {consecutive_failures} consecutive failures: {source}")]
    Unavailable {
        /// Number of consecutive failed polls, including the last one.
        consecutive_failures: u32,
        /// The failure of the last poll.
        #[source]
        source: ProtocolError,
    },
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u8,
        /// Maximum allowed value.
        max: u8,
        /// The actual value that was provided.
        actual: u8,
    },

    /// The string does not name a known system mode.
    #[error("invalid system mode: {0}")]
    InvalidSystemMode(String),
}

/// Errors related to HTTP communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered, but not with a success status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ProtocolError {
    /// Returns `true` for connection-level failures (refused, reset, timeout).
    ///
    /// Status failures mean the server is reachable but does not speak the
    /// expected protocol, so they are not transport failures. Neither are
    /// request builder errors such as a malformed URL: retrying cannot fix them.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_builder(),
            Self::ConnectionFailed(_) => true,
            Self::UnexpectedStatus { .. } | Self::InvalidAddress(_) => false,
        }
    }
}

/// Errors related to parsing device responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The body parsed but does not have the expected shape.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    /// The export template fetched from the device cannot be used.
    #[error("invalid export template: {0}")]
    InvalidTemplate(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
