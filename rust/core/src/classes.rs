// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! System-class names and bitmask decoding.
//!
//! A class bitmask sets bit *i* for every *i*-th name of an ordered
//! [`ClassTable`]. The same handful of bitmask values recurs across thousands
//! of elements, so [`ClassDecoder`] keeps every decoded list for the lifetime
//! of one resolution pass.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Widest bitmask the decoder reads.
pub const MAX_CLASS_BITS: usize = u64::BITS as usize;

/// Default MEP system-class names, in bit order.
pub const DEFAULT_CLASS_NAMES: [&str; 26] = [
    "Supply Air",
    "Return Air",
    "Exhaust Air",
    "Hydronic Supply",
    "Hydronic Return",
    "Domestic Hot Water",
    "Domestic Cold Water",
    "Sanitary",
    "Power",
    "Vent",
    "Controls",
    "Fire Protection Wet",
    "Fire Protection Dry",
    "Fire Protection Pre-Action",
    "Other Air",
    "Other",
    "Fire Protection Other",
    "Communication",
    "Data Circuit",
    "Telephone",
    "Security",
    "Fire Alarm",
    "Nurse Call",
    "Switch Topology",
    "Cable Tray Conduit",
    "Storm",
];

/// Ordered class-name table; position is the bit index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassTable {
    names: Vec<Arc<str>>,
}

impl ClassTable {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|s| Arc::from(s.as_ref())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name for bit `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(|s| s.as_ref())
    }

    /// Number of bit positions that carry a name.
    pub fn decodable_bits(&self) -> usize {
        self.names.len().min(MAX_CLASS_BITS)
    }

    /// Bitmask value of `name`, if the table contains it.
    pub fn bit_of(&self, name: &str) -> Option<u64> {
        self.names
            .iter()
            .take(MAX_CLASS_BITS)
            .position(|n| n.as_ref() == name)
            .map(|i| 1u64 << i)
    }

    /// Decodes without memoization: names whose bit is set, in table order.
    pub fn decode_uncached(&self, bitmask: u64) -> Vec<Arc<str>> {
        self.names
            .iter()
            .take(MAX_CLASS_BITS)
            .enumerate()
            .filter(|(i, _)| bitmask & (1u64 << i) != 0)
            .map(|(_, name)| Arc::clone(name))
            .collect()
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new(DEFAULT_CLASS_NAMES)
    }
}

/// Decoded class names for one bitmask.
pub type ClassNames = Arc<[Arc<str>]>;

/// Memoizing bitmask decoder shared by every lookup in a pass.
#[derive(Debug)]
pub struct ClassDecoder {
    table: ClassTable,
    cache: FxHashMap<u64, ClassNames>,
    empty: ClassNames,
}

impl ClassDecoder {
    pub fn new(table: ClassTable) -> Self {
        Self {
            table,
            cache: FxHashMap::default(),
            empty: Arc::from(Vec::new()),
        }
    }

    pub fn table(&self) -> &ClassTable {
        &self.table
    }

    /// Names carried by `bitmask`; `None` and `0` decode to nothing.
    pub fn decode(&mut self, bitmask: Option<u64>) -> ClassNames {
        let bitmask = match bitmask {
            Some(0) | None => return Arc::clone(&self.empty),
            Some(b) => b,
        };
        let table = &self.table;
        Arc::clone(
            self.cache
                .entry(bitmask)
                .or_insert_with(|| table.decode_uncached(bitmask).into()),
        )
    }

    /// `true` iff the two decoded name lists intersect.
    pub fn shares_class(&mut self, a: Option<u64>, b: Option<u64>) -> bool {
        let left = self.decode(a);
        if left.is_empty() {
            return false;
        }
        let right = self.decode(b);
        left.iter().any(|name| right.contains(name))
    }

    /// Number of distinct non-zero bitmasks decoded so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl Default for ClassDecoder {
    fn default() -> Self {
        Self::new(ClassTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &ClassNames) -> Vec<&str> {
        list.iter().map(|s| s.as_ref()).collect()
    }

    #[test]
    fn decode_zero_and_none_are_empty() {
        let mut decoder = ClassDecoder::default();
        assert!(decoder.decode(Some(0)).is_empty());
        assert!(decoder.decode(None).is_empty());
        assert_eq!(decoder.cached_len(), 0);
    }

    #[test]
    fn decode_in_table_order() {
        let mut decoder = ClassDecoder::default();
        let decoded = decoder.decode(Some(0b101));
        assert_eq!(names(&decoded), vec!["Supply Air", "Exhaust Air"]);
    }

    #[test]
    fn bits_beyond_table_are_ignored() {
        let mut decoder = ClassDecoder::new(ClassTable::new(["A", "B"]));
        assert_eq!(names(&decoder.decode(Some(0b110))), vec!["B"]);
        assert!(decoder.decode(Some(1 << 40)).is_empty());
    }

    #[test]
    fn memoizes_per_bitmask() {
        let mut decoder = ClassDecoder::default();
        let first = decoder.decode(Some(3));
        let second = decoder.decode(Some(3));
        assert!(Arc::ptr_eq(&first, &second));
        decoder.decode(Some(4));
        assert_eq!(decoder.cached_len(), 2);
    }

    #[test]
    fn shares_class_is_intersection() {
        let mut decoder = ClassDecoder::default();
        assert!(decoder.shares_class(Some(0b001), Some(0b011)));
        assert!(!decoder.shares_class(Some(0b100), Some(0b011)));
        assert!(!decoder.shares_class(Some(0), Some(0b011)));
        assert!(!decoder.shares_class(Some(0b011), None));
    }

    #[test]
    fn duplicate_names_match_across_bits() {
        let mut decoder = ClassDecoder::new(ClassTable::new(["Other", "Power", "Other"]));
        assert!(decoder.shares_class(Some(0b001), Some(0b100)));
    }

    #[test]
    fn bit_of_finds_position() {
        let table = ClassTable::default();
        assert_eq!(table.bit_of("Supply Air"), Some(1));
        assert_eq!(table.bit_of("Power"), Some(1 << 8));
        assert_eq!(table.bit_of("Steam"), None);
        assert_eq!(table.decodable_bits(), 26);
    }
}
