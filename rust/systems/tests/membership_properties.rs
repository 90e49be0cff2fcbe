// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;

use facility_lite_core::{system_id_for_key, ElementKind, ElementRecord};
use facility_lite_systems::{resolve_systems, ModelDescriptor, ResolverConfig, ScanError};
use proptest::prelude::*;

const SYSTEM_BITMASK: u64 = 0b0110;

fn primary() -> Vec<ElementRecord> {
    vec![ElementRecord::new("k1")
        .with("n:a", ElementKind::SYSTEM)
        .with("n:b", SYSTEM_BITMASK)]
}

/// (key index, bitmask, has standard column, has override column)
fn element_strategy() -> impl Strategy<Value = (u8, u64, bool, bool)> {
    (0u8..12, 0u64..16, any::<bool>(), any::<bool>())
}

fn build(key: u8, bitmask: u64, standard: bool, overridden: bool) -> ElementRecord {
    let id = system_id_for_key("k1");
    let mut record = ElementRecord::new(format!("e{key}")).with("n:b", bitmask);
    if standard {
        record.set(format!("m:{id}"), 1);
    }
    if overridden {
        record.set(format!("m:!{id}"), 1);
    }
    record
}

proptest! {
    #[test]
    fn global_count_is_union_of_model_breakdown(
        models in prop::collection::vec(prop::collection::vec(element_strategy(), 0..20), 1..4)
    ) {
        let scans: Vec<_> = models
            .iter()
            .enumerate()
            .map(|(i, elements)| {
                let records: Vec<ElementRecord> = elements
                    .iter()
                    .map(|&(k, b, s, o)| build(k, b, s, o))
                    .collect();
                (
                    ModelDescriptor::new(format!("M{i}"), format!("Model {i}")),
                    Ok::<_, ScanError>(records),
                )
            })
            .collect();

        let expected: BTreeSet<String> = models
            .iter()
            .flatten()
            .filter(|&&(_, b, s, o)| (s || o) && b & SYSTEM_BITMASK != 0)
            .map(|&(k, _, _, _)| format!("e{k}"))
            .collect();

        let report = resolve_systems(&primary(), scans, &ResolverConfig::default());
        let s1 = &report.systems[0];

        let union: BTreeSet<String> = s1
            .elements_by_model
            .iter()
            .flat_map(|m| m.keys.iter().cloned())
            .collect();
        prop_assert_eq!(s1.element_count, union.len());
        prop_assert_eq!(union, expected);

        for breakdown in &s1.elements_by_model {
            let distinct: BTreeSet<&String> = breakdown.keys.iter().collect();
            prop_assert_eq!(distinct.len(), breakdown.keys.len());
        }
    }
}
