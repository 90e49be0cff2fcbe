// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Facility-load entry points.
//!
//! [`load_systems`] drives a [`FacilitySource`]: primary scan, registry build,
//! then one scan per model folded into the registry. Scans may be in flight
//! concurrently (`max_concurrent_scans`) but results are merged one at a
//! time, in model-list order, by the registry fold.
//!
//! [`resolve_systems`] is the same pipeline over scans the caller already
//! holds.

use std::time::{Duration, Instant};

use facility_lite_core::ElementRecord;
use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::config::ResolverConfig;
use crate::diagnostics::Diagnostics;
use crate::error::ScanError;
use crate::finalize::finalize;
use crate::membership::resolve_membership;
use crate::model::{ModelDescriptor, SystemRecord};
use crate::registry::SystemRegistry;
use crate::source::FacilitySource;

/// Finalized systems of a facility plus what the pass observed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemsReport {
    pub systems: Vec<SystemRecord>,
    pub diagnostics: Diagnostics,
}

impl SystemsReport {
    fn from_registry(registry: &SystemRegistry) -> Self {
        Self {
            systems: finalize(registry),
            diagnostics: registry.diagnostics().clone(),
        }
    }

    /// Looks up a finalized system by id.
    pub fn system(&self, system_id: &str) -> Option<&SystemRecord> {
        self.systems.iter().find(|s| s.system_id == system_id)
    }
}

/// Resolves systems from scans already in hand.
pub fn resolve_systems<I>(primary: &[ElementRecord], scans: I, config: &ResolverConfig) -> SystemsReport
where
    I: IntoIterator<Item = (ModelDescriptor, Result<Vec<ElementRecord>, ScanError>)>,
{
    let registry = SystemRegistry::build(primary, config);
    let registry = resolve_membership(registry, scans);
    SystemsReport::from_registry(&registry)
}

/// Loads and resolves the systems of the facility behind `source`.
///
/// Never fails: an unreadable primary model yields no systems, an unreadable
/// model list yields systems without members, and an unreadable model is
/// skipped.
pub async fn load_systems<S>(source: &S, config: &ResolverConfig) -> SystemsReport
where
    S: FacilitySource + ?Sized,
{
    let start = Instant::now();

    let primary = match source.scan_primary_model().await {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(error = %err, "Primary model scan failed; no systems available");
            return SystemsReport::default();
        }
    };

    let mut registry = SystemRegistry::build(&primary, config);
    drop(primary);

    let models = match source.list_models().await {
        Ok(models) => models,
        Err(err) => {
            tracing::warn!(error = %err, "Could not list facility models; systems have no members");
            registry.diagnostics.model_listing_error = Some(err.to_string());
            return SystemsReport::from_registry(&registry);
        }
    };

    let model_count = models.len();
    let timeout = config.scan_timeout();
    tracing::info!(
        systems = registry.len(),
        models = model_count,
        concurrency = config.concurrency(),
        "Resolving system membership"
    );

    let registry = stream::iter(models)
        .map(move |model| async move {
            let scan = scan_with_timeout(source, &model.model_id, timeout).await;
            (model, scan)
        })
        .buffered(config.concurrency())
        .fold(registry, |registry, (model, scan)| async move {
            registry.absorb(&model, scan)
        })
        .await;

    let report = SystemsReport::from_registry(&registry);
    tracing::info!(
        systems = report.systems.len(),
        models = model_count,
        skipped = report.diagnostics.skipped_models.len(),
        elements = report.diagnostics.elements_scanned,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Resolved facility systems"
    );
    report
}

async fn scan_with_timeout<S>(
    source: &S,
    model_id: &str,
    timeout: Option<Duration>,
) -> Result<Vec<ElementRecord>, ScanError>
where
    S: FacilitySource + ?Sized,
{
    match timeout {
        None => source.scan_model(model_id).await,
        Some(limit) => tokio::time::timeout(limit, source.scan_model(model_id))
            .await
            .unwrap_or_else(|_| {
                Err(ScanError::Timeout {
                    model_id: model_id.to_string(),
                    secs: limit.as_secs(),
                })
            }),
    }
}
