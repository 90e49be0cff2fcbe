// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facility models and finalized system records.
//!
//! Everything here serializes to the camelCase JSON the rendering layer
//! consumes directly.

use serde::{Deserialize, Serialize};

/// A model belonging to the facility.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub model_id: String,
    pub label: String,
}

impl ModelDescriptor {
    pub fn new(model_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            label: label.into(),
        }
    }
}

/// A nested system element, attached to its parent system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemRecord {
    pub name: String,
    pub key: String,
    /// Raw key of the parent system element.
    pub parent: String,
    pub class_bitmask: u64,
}

/// Member keys contributed by one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelElements {
    #[serde(rename = "modelURN")]
    pub model_urn: String,
    pub model_name: String,
    pub keys: Vec<String>,
}

/// A finalized top-level system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemRecord {
    pub name: String,
    pub key: String,
    pub system_id: String,
    pub class_bitmask: u64,
    /// Distinct member keys across all models.
    pub element_count: usize,
    pub subsystems: Vec<SubsystemRecord>,
    /// Per-model breakdown in first-encountered model order.
    pub elements_by_model: Vec<ModelElements>,
}

impl SystemRecord {
    /// Breakdown entry for `model_urn`.
    pub fn model(&self, model_urn: &str) -> Option<&ModelElements> {
        self.elements_by_model
            .iter()
            .find(|m| m.model_urn == model_urn)
    }
}
