// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Facility-Lite Systems
//!
//! Cross-model system topology for a facility's building models.
//!
//! System elements (supply-air ducts, hydronic loops, power circuits, ...) are
//! authored in the facility's primary model. Member elements may live in any
//! model and reference their systems through system-reference columns. This
//! crate turns those scans into finalized [`SystemRecord`]s:
//!
//! 1. [`SystemRegistry::build`] registers the primary model's top-level
//!    systems and attaches their subsystems.
//! 2. [`SystemRegistry::absorb`] folds one model scan into the registry,
//!    admitting an element only when its classes overlap the referenced
//!    system's classes.
//! 3. [`finalize`] converts the accumulated sets into ordered, serializable
//!    records.
//!
//! [`load_systems`] runs the whole pipeline against a [`FacilitySource`].
//!
//! ```rust
//! use facility_lite_core::{system_id_for_key, ElementKind, ElementRecord};
//! use facility_lite_systems::{resolve_systems, ModelDescriptor, ResolverConfig};
//!
//! let primary = vec![ElementRecord::new("k1")
//!     .with("n:a", ElementKind::SYSTEM)
//!     .with("n:n", "Supply Air")
//!     .with("n:b", 0b001)];
//! let duct = ElementRecord::new("e1")
//!     .with("n:b", 0b001)
//!     .with(format!("m:!{}", system_id_for_key("k1")), 1);
//!
//! let report = resolve_systems(
//!     &primary,
//!     vec![(ModelDescriptor::new("M1", "Mechanical"), Ok(vec![duct]))],
//!     &ResolverConfig::default(),
//! );
//! assert_eq!(report.systems[0].element_count, 1);
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod finalize;
pub mod loader;
pub mod membership;
pub mod model;
pub mod registry;
pub mod source;

pub use config::ResolverConfig;
pub use diagnostics::{Diagnostics, SkippedModel};
pub use error::{Error, Result, ScanError};
pub use finalize::finalize;
pub use loader::{load_systems, resolve_systems, SystemsReport};
pub use membership::resolve_membership;
pub use model::{ModelDescriptor, ModelElements, SubsystemRecord, SystemRecord};
pub use registry::{SystemEntry, SystemRegistry};
pub use source::FacilitySource;
