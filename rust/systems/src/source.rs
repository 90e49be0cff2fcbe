// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to a facility's model scans.

use async_trait::async_trait;
use facility_lite_core::ElementRecord;

use crate::error::ScanError;
use crate::model::ModelDescriptor;

/// Supplies element scans for one facility.
///
/// Implemented by the transport layer; the resolver only needs these three
/// calls.
#[async_trait]
pub trait FacilitySource: Send + Sync {
    /// All records of the facility's primary model, including system
    /// elements.
    async fn scan_primary_model(&self) -> Result<Vec<ElementRecord>, ScanError>;

    /// Every model in the facility.
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ScanError>;

    /// Non-deleted, non-system records of one model.
    async fn scan_model(&self, model_id: &str) -> Result<Vec<ElementRecord>, ScanError>;
}
