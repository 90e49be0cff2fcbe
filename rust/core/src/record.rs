// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sparse element records and override-aware attribute resolution.
//!
//! A record is the element key plus whatever qualified columns the scan
//! returned for it. Every column holds an array of raw values; only the first
//! value is ever consulted here.
//!
//! ## Override precedence
//!
//! For any attribute with an override form, [`ElementRecord::resolve`] returns
//! the override's first value when it is *truthy*, otherwise the standard's
//! first value, otherwise [`Resolved::Absent`]. A falsy override (`0`, `""`,
//! `false`, `null`) therefore means "not overridden" for all override
//! families (name, classification, category, system class). A falsy standard
//! value is still reported as [`Resolved::Standard`]; only `null` or a missing
//! or empty array counts as absent.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::column::{ColumnParser, QualifiedColumn};
use crate::flags::ElementKind;
use crate::schema::{Attribute, ColumnSchema};

/// JSON truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Interprets a raw value as a non-negative integer.
///
/// Integral floats are accepted since scan payloads don't distinguish them.
pub fn value_as_u64(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// Outcome of resolving an attribute against its standard/override pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// The override column was present with a truthy first value.
    Override(&'a Value),
    /// The standard column supplied the value.
    Standard(&'a Value),
    /// Neither column supplied a value.
    Absent,
}

impl<'a> Resolved<'a> {
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Resolved::Override(v) | Resolved::Standard(v) => Some(v),
            Resolved::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Resolved::Absent)
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Resolved::Override(_))
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.value().and_then(value_as_u64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value().and_then(Value::as_i64)
    }
}

/// Values of a single column.
///
/// Deserializes from either an array or a bare scalar; a scalar becomes a
/// one-element array.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColumnValues(pub Vec<Value>);

impl ColumnValues {
    pub fn first(&self) -> Option<&Value> {
        self.0.first()
    }
}

impl<'de> Deserialize<'de> for ColumnValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(values) => ColumnValues(values),
            scalar => ColumnValues(vec![scalar]),
        })
    }
}

impl From<Vec<Value>> for ColumnValues {
    fn from(values: Vec<Value>) -> Self {
        ColumnValues(values)
    }
}

/// One element as returned by a model scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Short element key, unique within its model.
    #[serde(rename = "k")]
    pub key: String,
    /// Qualified column key -> raw values.
    #[serde(flatten)]
    pub columns: FxHashMap<String, ColumnValues>,
}

impl ElementRecord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            columns: FxHashMap::default(),
        }
    }

    /// Builder: sets `column` to a single value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Sets `column` to a single value, replacing previous values.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns
            .insert(column.into(), ColumnValues(vec![value.into()]));
    }

    /// Decodes a JSON array of records, as returned by a scan endpoint.
    pub fn from_json_array(json: &str) -> crate::Result<Vec<ElementRecord>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn values(&self, column: &str) -> Option<&[Value]> {
        self.columns.get(column).map(|v| v.0.as_slice())
    }

    pub fn first(&self, column: &str) -> Option<&Value> {
        self.columns.get(column).and_then(ColumnValues::first)
    }

    /// Resolves a standard/override column pair.
    pub fn resolve(&self, standard: &str, overridden: &str) -> Resolved<'_> {
        if let Some(value) = self.first(overridden).filter(|v| is_truthy(v)) {
            return Resolved::Override(value);
        }
        match self.first(standard) {
            Some(Value::Null) | None => Resolved::Absent,
            Some(value) => Resolved::Standard(value),
        }
    }

    /// Resolves a logical attribute using the schema's column pair.
    pub fn resolve_attribute(&self, schema: &ColumnSchema, attribute: Attribute) -> Resolved<'_> {
        let columns = schema.columns(attribute);
        self.resolve(&columns.standard, &columns.overridden)
    }

    /// Effective display name.
    pub fn name(&self, schema: &ColumnSchema) -> Option<&str> {
        self.resolve_attribute(schema, Attribute::Name).as_str()
    }

    /// Effective classification code.
    pub fn classification(&self, schema: &ColumnSchema) -> Option<&str> {
        self.resolve_attribute(schema, Attribute::Classification)
            .as_str()
    }

    /// Effective category id.
    pub fn category(&self, schema: &ColumnSchema) -> Option<i64> {
        self.resolve_attribute(schema, Attribute::Category).as_i64()
    }

    /// Effective system-class bitmask.
    pub fn system_class(&self, schema: &ColumnSchema) -> Option<u64> {
        self.resolve_attribute(schema, Attribute::SystemClass)
            .as_u64()
    }

    /// Element kind from the flags column; records without flags are simple
    /// elements.
    pub fn element_kind(&self, schema: &ColumnSchema) -> ElementKind {
        match self.first(&schema.element_flags) {
            None | Some(Value::Null) => ElementKind::SimpleElement,
            Some(value) => {
                let raw = match value.as_i64() {
                    // Signed 32-bit payloads (e.g. -2 for deleted) wrap like the wire format.
                    Some(raw) => i32::try_from(raw)
                        .map(|v| v as u32)
                        .or_else(|_| u32::try_from(raw))
                        .ok(),
                    None => value_as_u64(value).and_then(|raw| u32::try_from(raw).ok()),
                };
                raw.map(ElementKind::from_raw)
                    .unwrap_or(ElementKind::Unknown(u32::MAX))
            }
        }
    }

    /// Whether the record carries a truthy parent reference of any type.
    pub fn has_parent(&self, schema: &ColumnSchema) -> bool {
        self.first(&schema.parent).is_some_and(is_truthy)
    }

    /// Parent key of a nested element, if it carries a truthy string one.
    pub fn parent(&self, schema: &ColumnSchema) -> Option<&str> {
        self.first(&schema.parent)
            .filter(|v| is_truthy(v))
            .and_then(Value::as_str)
    }

    /// System-reference columns present on this record, in either standard
    /// or override form.
    pub fn system_references(
        &self,
        schema: &ColumnSchema,
        parser: &mut ColumnParser,
    ) -> Vec<Arc<QualifiedColumn>> {
        self.columns
            .keys()
            .filter_map(|raw| parser.parse(raw))
            .filter(|col| col.family == schema.systems_family)
            .collect()
    }
}
