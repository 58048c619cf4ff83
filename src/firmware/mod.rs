// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Latest firmware versions published by Bayernluft.
//!
//! The firmware server publishes one plain-text version file per
//! [`UpdateTarget`]. Versions are polled on their own slow schedule and
//! cached per family; a failed poll keeps the previously cached value.

use std::collections::HashMap;

use crate::error::ProtocolError;
use crate::protocol::{Protocol, normalize_base_url};
use crate::types::UpdateTarget;

/// Firmware server location.
///
/// # Examples
///
/// ```
/// use luefter_lib::firmware::FirmwareServer;
/// use luefter_lib::types::UpdateTarget;
///
/// let server = FirmwareServer::default();
/// assert_eq!(
///     server.version_url(UpdateTarget::Wlan32),
///     "https://www.bayernluft.de/de/download/wlan32/version.txt"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareServer {
    base_url: String,
}

impl FirmwareServer {
    /// Official Bayernluft server.
    pub const DEFAULT_URL: &'static str = "https://www.bayernluft.de";

    /// Creates a server description for a custom base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
        }
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the latest version file for a family.
    #[must_use]
    pub fn version_url(&self, target: UpdateTarget) -> String {
        format!("{}{}", self.base_url, target.version_path())
    }

    /// URL of the release notes page for a family.
    #[must_use]
    pub fn release_notes_url(&self, target: UpdateTarget) -> String {
        format!("{}{}", self.base_url, target.release_notes_path())
    }
}

impl Default for FirmwareServer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_URL)
    }
}

/// Latest known version per firmware family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionCache {
    versions: HashMap<UpdateTarget, String>,
}

impl VersionCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached version of a family.
    #[must_use]
    pub fn get(&self, target: UpdateTarget) -> Option<&str> {
        self.versions.get(&target).map(String::as_str)
    }

    /// Stores a version, replacing any previous one.
    pub fn insert(&mut self, target: UpdateTarget, version: String) {
        self.versions.insert(target, version);
    }

    /// Returns `true` if no version is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Outcome of polling every firmware family.
#[derive(Debug, Default)]
pub struct VersionPollSummary {
    /// Families whose version was fetched, with the version.
    pub updated: Vec<(UpdateTarget, String)>,
    /// Families whose fetch failed.
    pub failed: Vec<(UpdateTarget, ProtocolError)>,
}

impl VersionPollSummary {
    /// Returns `true` if every family was fetched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetches the latest version of every family.
///
/// Each family is fetched independently; one failure does not stop the
/// other request. Surrounding whitespace is trimmed from the version text.
pub async fn fetch_latest_versions<P: Protocol>(
    protocol: &P,
    server: &FirmwareServer,
) -> VersionPollSummary {
    let mut summary = VersionPollSummary::default();

    for target in UpdateTarget::ALL {
        match protocol.fetch_url(&server.version_url(target)).await {
            Ok(body) => {
                let version = body.trim().to_string();
                tracing::debug!(%target, %version, "Fetched latest firmware version");
                summary.updated.push((target, version));
            }
            Err(e) => {
                tracing::warn!(%target, error = %e, "Failed to fetch latest firmware version");
                summary.failed.push((target, e));
            }
        }
    }

    summary
}
