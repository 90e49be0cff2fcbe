// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Column layout of element records.
//!
//! The consuming code never spells raw key strings; it asks a
//! [`ColumnSchema`] for the columns of a logical [`Attribute`].

use serde::{Deserialize, Serialize};

use crate::column::QualifiedColumn;

/// Logical attributes that support designer overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Name,
    Classification,
    Category,
    SystemClass,
}

/// Standard/override key pair for one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeColumns {
    pub standard: String,
    pub overridden: String,
}

impl AttributeColumns {
    /// Builds the pair `family:code` / `family:!code`.
    pub fn of(family: &str, code: &str) -> Self {
        let standard = QualifiedColumn::standard_of(family, code);
        Self {
            overridden: standard.overridden().to_key(),
            standard: standard.to_key(),
        }
    }
}

/// Where each attribute lives in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub name: AttributeColumns,
    pub classification: AttributeColumns,
    pub category: AttributeColumns,
    pub system_class: AttributeColumns,
    /// Element-flags column (no override form).
    pub element_flags: String,
    /// Parent reference carried by nested system elements.
    pub parent: String,
    /// Family of the per-system reference columns: `<family>:<systemId>`.
    pub systems_family: String,
}

impl ColumnSchema {
    pub const STANDARD_FAMILY: &'static str = "n";
    pub const REFS_FAMILY: &'static str = "l";
    pub const SYSTEMS_FAMILY: &'static str = "m";

    /// Returns the column pair for `attribute`.
    pub fn columns(&self, attribute: Attribute) -> &AttributeColumns {
        match attribute {
            Attribute::Name => &self.name,
            Attribute::Classification => &self.classification,
            Attribute::Category => &self.category,
            Attribute::SystemClass => &self.system_class,
        }
    }

    /// Same schema with system references under a different family.
    pub fn with_systems_family(mut self, family: impl Into<String>) -> Self {
        self.systems_family = family.into();
        self
    }
}

impl Default for ColumnSchema {
    fn default() -> Self {
        let family = Self::STANDARD_FAMILY;
        Self {
            name: AttributeColumns::of(family, "n"),
            classification: AttributeColumns::of(family, "v"),
            category: AttributeColumns::of(family, "c"),
            system_class: AttributeColumns::of(family, "b"),
            element_flags: QualifiedColumn::standard_of(family, "a").to_key(),
            parent: QualifiedColumn::standard_of(Self::REFS_FAMILY, "p").to_key(),
            systems_family: Self::SYSTEMS_FAMILY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let schema = ColumnSchema::default();
        assert_eq!(schema.columns(Attribute::Name).standard, "n:n");
        assert_eq!(schema.columns(Attribute::Name).overridden, "n:!n");
        assert_eq!(schema.columns(Attribute::SystemClass).overridden, "n:!b");
        assert_eq!(schema.element_flags, "n:a");
        assert_eq!(schema.parent, "l:p");
        assert_eq!(schema.systems_family, "m");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let schema: ColumnSchema = serde_json::from_str(r#"{"systems_family":"sys"}"#).unwrap();
        assert_eq!(schema.systems_family, "sys");
        assert_eq!(schema.name, AttributeColumns::of("n", "n"));
    }
}
