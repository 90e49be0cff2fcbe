// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Qualified column names.
//!
//! Every attribute of an element record lives under a key of the form
//! `family:code`. A `!` in front of the code (`family:!code`) marks a
//! user/designer override of the standard column with the same code.
//! [`ColumnParser`] turns raw keys into [`QualifiedColumn`]s once per distinct
//! key string, so a scan of thousands of records with the same few dozen keys
//! only parses each key once.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::Error;

/// Marker that separates family from code.
pub const FAMILY_SEPARATOR: char = ':';

/// Marker at the start of a code denoting an override column.
pub const OVERRIDE_MARKER: char = '!';

/// A parsed `family:code` / `family:!code` column key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedColumn {
    pub family: String,
    pub code: String,
    pub is_override: bool,
}

impl QualifiedColumn {
    /// Creates a standard (non-override) column.
    pub fn standard_of(family: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            code: code.into(),
            is_override: false,
        }
    }

    /// Parses a raw key. Returns `None` for keys that are not qualified
    /// columns (e.g. the record key `k`).
    pub fn parse(raw: &str) -> Option<Self> {
        let (family, code) = raw.split_once(FAMILY_SEPARATOR)?;
        if family.is_empty() {
            return None;
        }
        let (code, is_override) = match code.strip_prefix(OVERRIDE_MARKER) {
            Some(rest) => (rest, true),
            None => (code, false),
        };
        if code.is_empty() {
            return None;
        }
        Some(Self {
            family: family.to_string(),
            code: code.to_string(),
            is_override,
        })
    }

    /// The standard column paired with this one.
    pub fn standard(&self) -> Self {
        Self {
            is_override: false,
            ..self.clone()
        }
    }

    /// The override column paired with this one.
    pub fn overridden(&self) -> Self {
        Self {
            is_override: true,
            ..self.clone()
        }
    }

    /// Returns the raw key string (`family:code` or `family:!code`).
    pub fn to_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QualifiedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_override {
            write!(f, "{}{}{}{}", self.family, FAMILY_SEPARATOR, OVERRIDE_MARKER, self.code)
        } else {
            write!(f, "{}{}{}", self.family, FAMILY_SEPARATOR, self.code)
        }
    }
}

impl FromStr for QualifiedColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::InvalidColumn(s.to_string()))
    }
}

/// Memoizing parser for raw column keys.
///
/// Lives for one resolution pass. Unqualified keys are cached as `None` so
/// they are not re-examined either.
#[derive(Debug, Default)]
pub struct ColumnParser {
    cache: FxHashMap<String, Option<Arc<QualifiedColumn>>>,
}

impl ColumnParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `raw`, returning the cached result for keys seen before.
    pub fn parse(&mut self, raw: &str) -> Option<Arc<QualifiedColumn>> {
        if let Some(hit) = self.cache.get(raw) {
            return hit.clone();
        }
        let parsed = QualifiedColumn::parse(raw).map(Arc::new);
        self.cache.insert(raw.to_string(), parsed.clone());
        parsed
    }

    /// Number of distinct raw keys parsed so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
