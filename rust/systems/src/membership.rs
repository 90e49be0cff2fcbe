// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cross-model membership resolution.
//!
//! Member elements point at systems through system-reference columns,
//! `<systems-family>:<systemId>` or its override form. A reference alone is
//! not enough: the element's decoded classes must share at least one name
//! with the referenced system's classes. Stale references left over from an
//! earlier model revision are therefore filtered out by the class check.
//!
//! Resolution is a fold of [`SystemRegistry::absorb`] over model scans. Each
//! step consumes the registry and returns it with the model's members added,
//! so there is a single writer no matter how scans were fetched.

use facility_lite_core::ElementRecord;

use crate::diagnostics::SkippedModel;
use crate::error::ScanError;
use crate::model::ModelDescriptor;
use crate::registry::{ModelMembers, SystemRegistry};

/// What the reference columns of one element resolved to.
#[derive(Debug, Default)]
struct ElementMatch {
    systems: Vec<usize>,
    stale: usize,
    unknown: usize,
    unclassified: bool,
}

impl SystemRegistry {
    /// Adds one model's scan to the registry.
    ///
    /// A failed scan is logged and recorded as skipped; the registry is
    /// returned unchanged otherwise.
    pub fn absorb(
        mut self,
        model: &ModelDescriptor,
        scan: Result<Vec<ElementRecord>, ScanError>,
    ) -> Self {
        match scan {
            Ok(records) => self.absorb_records(model, &records),
            Err(err) => {
                tracing::warn!(
                    model_id = %model.model_id,
                    model = %model.label,
                    error = %err,
                    "Skipping model whose scan failed"
                );
                self.diagnostics.skipped_models.push(SkippedModel {
                    model_id: model.model_id.clone(),
                    reason: err.to_string(),
                });
            }
        }
        self
    }

    /// Adds the members found in `records` on behalf of `model`.
    pub fn absorb_records(&mut self, model: &ModelDescriptor, records: &[ElementRecord]) {
        let mut examined = 0usize;
        let mut matched = 0usize;

        for record in records {
            let Some(found) = self.match_element(record) else {
                continue;
            };
            examined += 1;
            self.diagnostics.stale_references += found.stale;
            self.diagnostics.unknown_references += found.unknown;
            if found.unclassified {
                self.diagnostics.unclassified_elements += 1;
                continue;
            }
            for index in found.systems {
                matched += 1;
                let entry = &mut self.systems[index];
                entry.members.insert(record.key.clone());
                entry
                    .by_model
                    .entry(model.model_id.clone())
                    .or_insert_with(|| ModelMembers {
                        model_name: model.label.clone(),
                        keys: Default::default(),
                    })
                    .keys
                    .insert(record.key.clone());
            }
        }

        self.diagnostics.models_scanned += 1;
        self.diagnostics.elements_scanned += examined;
        tracing::debug!(
            model_id = %model.model_id,
            records = records.len(),
            examined,
            matched,
            "Absorbed model scan"
        );
    }

    /// Ids of the systems `record` belongs to.
    ///
    /// Applies the same filtering as [`absorb`](Self::absorb) without
    /// recording anything.
    pub fn systems_for_element(&mut self, record: &ElementRecord) -> Vec<&str> {
        let indices = self
            .match_element(record)
            .map(|found| found.systems)
            .unwrap_or_default();
        indices
            .into_iter()
            .map(|i| self.systems[i].system_id.as_str())
            .collect()
    }

    /// `None` for records that can't be members at all (systems, deleted).
    fn match_element(&mut self, record: &ElementRecord) -> Option<ElementMatch> {
        if !record.element_kind(&self.schema).is_member_candidate() {
            return None;
        }

        let element_class = record.system_class(&self.schema);
        if self.decoder.decode(element_class).is_empty() {
            return Some(ElementMatch {
                unclassified: true,
                ..Default::default()
            });
        }

        let mut found = ElementMatch::default();
        for column in record.system_references(&self.schema, &mut self.parser) {
            let Some(&index) = self.by_id.get(&column.code) else {
                found.unknown += 1;
                continue;
            };
            let system_class = Some(self.systems[index].class_bitmask);
            if !self.decoder.shares_class(element_class, system_class) {
                found.stale += 1;
                continue;
            }
            if !found.systems.contains(&index) {
                found.systems.push(index);
            }
        }
        Some(found)
    }
}

/// Folds `scans` into `registry`, in iteration order.
pub fn resolve_membership<I>(registry: SystemRegistry, scans: I) -> SystemRegistry
where
    I: IntoIterator<Item = (ModelDescriptor, Result<Vec<ElementRecord>, ScanError>)>,
{
    scans
        .into_iter()
        .fold(registry, |registry, (model, scan)| registry.absorb(&model, scan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use facility_lite_core::{system_id_for_key, ElementKind};

    fn registry() -> SystemRegistry {
        let primary = vec![
            ElementRecord::new("k1")
                .with("n:a", ElementKind::SYSTEM)
                .with("n:n", "Supply")
                .with("n:b", 0b011),
            ElementRecord::new("k5")
                .with("n:a", ElementKind::SYSTEM)
                .with("n:n", "Power")
                .with("n:b", 0b1_0000_0000),
        ];
        SystemRegistry::build(&primary, &ResolverConfig::default())
    }

    fn member(key: &str, bitmask: u64, system_key: &str) -> ElementRecord {
        ElementRecord::new(key)
            .with("n:b", bitmask)
            .with(format!("m:!{}", system_id_for_key(system_key)), 1)
    }

    fn m1() -> ModelDescriptor {
        ModelDescriptor::new("M1", "Mechanical")
    }

    #[test]
    fn overlapping_class_is_member() {
        let mut registry = registry();
        registry.absorb_records(&m1(), &[member("e1", 0b001, "k1")]);
        let s1 = &registry.systems()[0];
        assert!(s1.is_member("e1"));
        assert_eq!(s1.member_count(), 1);
    }

    #[test]
    fn disjoint_class_is_not_member() {
        let mut registry = registry();
        registry.absorb_records(&m1(), &[member("e2", 0b100, "k1")]);
        assert_eq!(registry.systems()[0].member_count(), 0);
        assert_eq!(registry.diagnostics().stale_references, 1);
    }

    #[test]
    fn same_system_via_two_columns_counts_once() {
        let id = system_id_for_key("k1");
        let rec = ElementRecord::new("e1")
            .with("n:b", 0b001)
            .with(format!("m:!{id}"), 1)
            .with(format!("m:{id}"), 1);
        let mut registry = registry();
        registry.absorb_records(&m1(), &[rec.clone(), rec]);
        let s1 = &registry.systems()[0];
        assert_eq!(s1.member_count(), 1);
        assert_eq!(s1.by_model["M1"].keys.len(), 1);
    }

    #[test]
    fn element_class_override_decides_overlap() {
        let rec = member("e1", 0b100, "k1").with("n:!b", 0b001);
        let mut registry = registry();
        registry.absorb_records(&m1(), &[rec]);
        assert!(registry.systems()[0].is_member("e1"));
        assert_eq!(registry.diagnostics().stale_references, 0);
    }

    #[test]
    fn zero_class_override_falls_back_to_standard() {
        let rec = member("e1", 0b001, "k1").with("n:!b", 0);
        let mut registry = registry();
        registry.absorb_records(&m1(), &[rec]);
        assert!(registry.systems()[0].is_member("e1"));
        assert_eq!(registry.diagnostics().unclassified_elements, 0);
    }

    #[test]
    fn unknown_system_reference_is_skipped() {
        let rec = ElementRecord::new("e1")
            .with("n:b", 0b001)
            .with("m:nosuch", 1);
        let mut registry = registry();
        registry.absorb_records(&m1(), &[rec]);
        assert!(registry.systems().iter().all(|s| s.member_count() == 0));
        assert_eq!(registry.diagnostics().unknown_references, 1);
    }

    #[test]
    fn unclassified_element_never_matches() {
        let rec = ElementRecord::new("e1").with(format!("m:{}", system_id_for_key("k1")), 1);
        let mut registry = registry();
        registry.absorb_records(&m1(), &[rec]);
        assert_eq!(registry.systems()[0].member_count(), 0);
        assert_eq!(registry.diagnostics().unclassified_elements, 1);
    }

    #[test]
    fn deleted_and_system_records_are_not_members() {
        let deleted = member("e1", 0b001, "k1").with("n:a", ElementKind::DELETED);
        let nested = member("k2", 0b001, "k1").with("n:a", ElementKind::SYSTEM);
        let mut registry = registry();
        registry.absorb_records(&m1(), &[deleted, nested]);
        assert_eq!(registry.systems()[0].member_count(), 0);
        assert_eq!(registry.diagnostics().elements_scanned, 0);
    }

    #[test]
    fn element_may_join_several_systems() {
        let rec = ElementRecord::new("e1")
            .with("n:b", 0b1_0000_0001)
            .with(format!("m:{}", system_id_for_key("k1")), 1)
            .with(format!("m:{}", system_id_for_key("k5")), 1);
        let mut registry = registry();
        let mut ids = registry.systems_for_element(&rec);
        ids.sort();
        let mut expected = vec![system_id_for_key("k1"), system_id_for_key("k5")];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn failed_scan_is_recorded_and_skipped() {
        let registry = registry().absorb(
            &ModelDescriptor::new("M2", "Electrical"),
            Err(ScanError::Transport("503".into())),
        );
        assert!(registry.diagnostics().skipped("M2"));
        assert_eq!(registry.diagnostics().models_scanned, 0);
    }

    #[test]
    fn fold_keeps_first_encountered_model_order() {
        let scans = vec![
            (ModelDescriptor::new("M2", "B"), Ok(vec![member("x", 1, "k1")])),
            (ModelDescriptor::new("M1", "A"), Ok(vec![member("y", 1, "k1")])),
        ];
        let registry = resolve_membership(registry(), scans);
        let order: Vec<&str> = registry.systems()[0]
            .by_model
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(order, vec!["M2", "M1"]);
    }
}
