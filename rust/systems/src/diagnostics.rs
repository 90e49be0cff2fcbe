// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Counters collected alongside membership resolution.
//!
//! None of these feed back into membership; they only describe what the pass
//! saw and dropped.

use serde::Serialize;

/// A model whose scan was excluded from membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedModel {
    pub model_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Top-level systems registered from the primary model.
    pub systems: usize,
    /// Nested systems whose parent key matched no top-level system.
    pub orphan_subsystems: usize,
    /// Top-level systems whose derived id was already taken.
    pub system_id_collisions: usize,
    /// Models whose scans were absorbed.
    pub models_scanned: usize,
    /// Member-candidate elements examined across all models.
    pub elements_scanned: usize,
    /// Candidates without a decodable class.
    pub unclassified_elements: usize,
    /// References to a known system whose classes don't overlap the element's.
    pub stale_references: usize,
    /// References naming no registered system.
    pub unknown_references: usize,
    pub skipped_models: Vec<SkippedModel>,
    /// Set when the facility's model list could not be fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_listing_error: Option<String>,
}

impl Diagnostics {
    pub fn skipped(&self, model_id: &str) -> bool {
        self.skipped_models.iter().any(|m| m.model_id == model_id)
    }
}
