// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of accumulated membership into finalized system records.

use crate::model::{ModelElements, SystemRecord};
use crate::registry::{SystemEntry, SystemRegistry};

impl SystemEntry {
    /// Snapshot of this system as a finalized record.
    pub fn to_record(&self) -> SystemRecord {
        SystemRecord {
            name: self.name.clone(),
            key: self.key.clone(),
            system_id: self.system_id.clone(),
            class_bitmask: self.class_bitmask,
            element_count: self.members.len(),
            subsystems: self.subsystems.clone(),
            elements_by_model: self
                .by_model
                .iter()
                .map(|(model_urn, members)| ModelElements {
                    model_urn: model_urn.clone(),
                    model_name: members.model_name.clone(),
                    keys: members.keys.iter().cloned().collect(),
                })
                .collect(),
        }
    }
}

/// Finalizes every system, in primary-scan order.
///
/// Does not consume or modify the registry, so repeated calls agree.
pub fn finalize(registry: &SystemRegistry) -> Vec<SystemRecord> {
    registry.systems().iter().map(SystemEntry::to_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverConfig;
    use crate::model::ModelDescriptor;
    use facility_lite_core::{system_id_for_key, ElementKind, ElementRecord};

    fn populated() -> SystemRegistry {
        let primary = vec![ElementRecord::new("k1")
            .with("n:a", ElementKind::SYSTEM)
            .with("n:n", "Supply")
            .with("n:b", 0b011)];
        let mut registry = SystemRegistry::build(&primary, &ResolverConfig::default());
        let column = format!("m:{}", system_id_for_key("k1"));
        registry.absorb_records(
            &ModelDescriptor::new("M1", "Mechanical"),
            &[
                ElementRecord::new("e1").with("n:b", 1).with(column.as_str(), 1),
                ElementRecord::new("e3").with("n:b", 2).with(column.as_str(), 1),
            ],
        );
        registry.absorb_records(
            &ModelDescriptor::new("M2", "Plumbing"),
            &[ElementRecord::new("e1").with("n:b", 1).with(column.as_str(), 1)],
        );
        registry
    }

    #[test]
    fn counts_and_breakdown() {
        let systems = finalize(&populated());
        assert_eq!(systems.len(), 1);
        let s1 = &systems[0];
        assert_eq!(s1.element_count, 2);
        assert_eq!(s1.elements_by_model.len(), 2);
        assert_eq!(s1.elements_by_model[0].model_urn, "M1");
        assert_eq!(s1.elements_by_model[0].model_name, "Mechanical");
        assert_eq!(s1.elements_by_model[0].keys, vec!["e1", "e3"]);
        assert_eq!(s1.elements_by_model[1].keys, vec!["e1"]);
    }

    #[test]
    fn finalize_is_idempotent() {
        let registry = populated();
        assert_eq!(finalize(&registry), finalize(&registry));
    }

    #[test]
    fn empty_registry_finalizes_to_nothing() {
        let registry = SystemRegistry::empty(&ResolverConfig::default());
        assert!(finalize(&registry).is_empty());
    }
}
