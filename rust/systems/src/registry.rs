// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! System registry built from the facility's primary model.
//!
//! The [`SystemRegistry`] owns every top-level system of the facility and the
//! per-pass memo tables (column parser, class decoder). It is the state that
//! membership resolution folds over model scans (see `membership.rs`) and
//! that finalization turns into [`SystemRecord`](crate::SystemRecord)s.
//!
//! ## Top-level systems and subsystems
//!
//! Only System-flagged elements take part. Those without a parent reference
//! become top-level systems; those with one become subsystems and are
//! attached to the top-level system whose *raw key* equals the parent value.
//! A subsystem whose parent matches nothing is dropped: it is counted in
//! [`Diagnostics::orphan_subsystems`] and otherwise disappears.

use facility_lite_core::{
    system_id_for_key, ClassDecoder, ColumnParser, ColumnSchema, ElementKind, ElementRecord,
};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

use crate::config::ResolverConfig;
use crate::diagnostics::Diagnostics;
use crate::model::SubsystemRecord;

/// Member keys one model contributed to a system.
#[derive(Debug, Clone, Default)]
pub(crate) struct ModelMembers {
    pub(crate) model_name: String,
    pub(crate) keys: IndexSet<String>,
}

/// A top-level system while membership is being accumulated.
#[derive(Debug, Clone)]
pub struct SystemEntry {
    pub name: String,
    pub key: String,
    pub system_id: String,
    pub class_bitmask: u64,
    pub subsystems: Vec<SubsystemRecord>,
    pub(crate) members: IndexSet<String>,
    pub(crate) by_model: IndexMap<String, ModelMembers>,
}

impl SystemEntry {
    fn new(name: String, key: String, class_bitmask: u64) -> Self {
        Self {
            system_id: system_id_for_key(&key),
            name,
            key,
            class_bitmask,
            subsystems: Vec::new(),
            members: IndexSet::new(),
            by_model: IndexMap::new(),
        }
    }

    /// Distinct member keys across all absorbed models.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, key: &str) -> bool {
        self.members.contains(key)
    }
}

/// Registry of the facility's systems, keyed by system id.
#[derive(Debug)]
pub struct SystemRegistry {
    pub(crate) schema: ColumnSchema,
    pub(crate) decoder: ClassDecoder,
    pub(crate) parser: ColumnParser,
    pub(crate) systems: Vec<SystemEntry>,
    pub(crate) by_id: FxHashMap<String, usize>,
    pub(crate) diagnostics: Diagnostics,
}

impl SystemRegistry {
    /// Creates an empty registry (no systems).
    pub fn empty(config: &ResolverConfig) -> Self {
        Self {
            schema: config.columns.clone(),
            decoder: ClassDecoder::new(config.class_table.clone()),
            parser: ColumnParser::new(),
            systems: Vec::new(),
            by_id: FxHashMap::default(),
            diagnostics: Diagnostics::default(),
        }
    }

    /// Builds the registry from the primary model's scan.
    ///
    /// Non-system records in `primary` are ignored.
    pub fn build(primary: &[ElementRecord], config: &ResolverConfig) -> Self {
        let mut registry = Self::empty(config);
        let schema = &registry.schema;

        let (nested, top_level): (Vec<&ElementRecord>, Vec<&ElementRecord>) = primary
            .iter()
            .filter(|rec| rec.element_kind(schema) == ElementKind::System)
            .partition(|rec| rec.has_parent(schema));

        let tops: Vec<SystemEntry> = top_level
            .into_iter()
            .map(|rec| {
                SystemEntry::new(
                    rec.name(schema).unwrap_or_default().to_string(),
                    rec.key.clone(),
                    rec.system_class(schema).unwrap_or(0),
                )
            })
            .collect();

        let nested_count = nested.len();
        let subsystems: Vec<SubsystemRecord> = nested
            .into_iter()
            .filter_map(|rec| {
                // Non-string parents can't name a key.
                Some(SubsystemRecord {
                    name: rec.name(schema).unwrap_or_default().to_string(),
                    key: rec.key.clone(),
                    parent: rec.parent(schema)?.to_string(),
                    class_bitmask: rec.system_class(schema).unwrap_or(0),
                })
            })
            .collect();
        registry.diagnostics.orphan_subsystems += nested_count - subsystems.len();

        for entry in tops {
            registry.insert_system(entry);
        }
        for subsystem in subsystems {
            registry.attach_subsystem(subsystem);
        }

        registry.diagnostics.systems = registry.systems.len();
        tracing::debug!(
            systems = registry.systems.len(),
            orphan_subsystems = registry.diagnostics.orphan_subsystems,
            "Built system registry"
        );
        registry
    }

    fn insert_system(&mut self, entry: SystemEntry) {
        let index = self.systems.len();
        if let Some(&existing) = self.by_id.get(&entry.system_id) {
            tracing::warn!(
                system_id = %entry.system_id,
                key = %entry.key,
                existing_key = %self.systems[existing].key,
                "Duplicate system id; references resolve to the first system"
            );
            self.diagnostics.system_id_collisions += 1;
        } else {
            self.by_id.insert(entry.system_id.clone(), index);
        }
        self.systems.push(entry);
    }

    fn attach_subsystem(&mut self, subsystem: SubsystemRecord) {
        match self.systems.iter_mut().find(|s| s.key == subsystem.parent) {
            Some(parent) => parent.subsystems.push(subsystem),
            None => {
                tracing::debug!(
                    key = %subsystem.key,
                    parent = %subsystem.parent,
                    "Dropping subsystem with unknown parent"
                );
                self.diagnostics.orphan_subsystems += 1;
            }
        }
    }

    /// Top-level systems in primary-scan order.
    pub fn systems(&self) -> &[SystemEntry] {
        &self.systems
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Looks up a system by its id.
    pub fn get(&self, system_id: &str) -> Option<&SystemEntry> {
        self.by_id.get(system_id).map(|&i| &self.systems[i])
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
