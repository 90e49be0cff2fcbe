// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Facility-Lite Core
//!
//! Typed access to the sparse element records returned by building-model
//! scans.
//!
//! ## Overview
//!
//! - **Qualified columns**: `family:code` keys, with `family:!code` marking a
//!   designer override, parsed once per distinct key
//! - **Attribute resolution**: override-over-standard precedence with an
//!   explicit [`Resolved`] result
//! - **Class bitmasks**: memoized decoding into ordered class names
//! - **Key encoding**: short keys, full keys and derived system ids
//!
//! ## Quick Start
//!
//! ```rust
//! use facility_lite_core::{ClassDecoder, ColumnSchema, ElementRecord};
//!
//! let schema = ColumnSchema::default();
//! let record = ElementRecord::new("AAAB")
//!     .with("n:n", "AHU-1")
//!     .with("n:!n", "AHU-01")
//!     .with("n:b", 0b011);
//!
//! assert_eq!(record.name(&schema), Some("AHU-01"));
//!
//! let mut decoder = ClassDecoder::default();
//! let classes = decoder.decode(record.system_class(&schema));
//! assert_eq!(classes.len(), 2);
//! ```

pub mod classes;
pub mod column;
pub mod error;
pub mod flags;
pub mod keys;
pub mod record;
pub mod schema;

pub use classes::{ClassDecoder, ClassNames, ClassTable, DEFAULT_CLASS_NAMES};
pub use column::{ColumnParser, QualifiedColumn};
pub use error::{Error, Result};
pub use flags::ElementKind;
pub use keys::{system_id_for_key, to_full_key, to_short_key};
pub use record::{is_truthy, ColumnValues, ElementRecord, Resolved};
pub use schema::{Attribute, AttributeColumns, ColumnSchema};
