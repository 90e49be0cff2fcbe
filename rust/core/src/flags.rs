// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element kinds decoded from the element-flags column.

use serde::{Deserialize, Serialize};

/// What an element record represents, decoded from its raw flags value.
///
/// The flags column is an enumerated value rather than a bit set; values the
/// table doesn't know are kept as [`ElementKind::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    #[default]
    SimpleElement,
    NestedChild,
    NestedParent,
    CompositeChild,
    CompositeParent,
    Room,
    FamilyType,
    Level,
    DocumentRoot,
    Stream,
    System,
    GenericAsset,
    Virtual,
    Deleted,
    Unknown(u32),
}

impl ElementKind {
    pub const SIMPLE_ELEMENT: u32 = 0x0000_0000;
    pub const NESTED_CHILD: u32 = 0x0000_0001;
    pub const NESTED_PARENT: u32 = 0x0000_0002;
    pub const COMPOSITE_CHILD: u32 = 0x0000_0003;
    pub const COMPOSITE_PARENT: u32 = 0x0000_0004;
    pub const ROOM: u32 = 0x0000_0005;
    pub const FAMILY_TYPE: u32 = 0x0100_0000;
    pub const LEVEL: u32 = 0x0100_0001;
    pub const DOCUMENT_ROOT: u32 = 0x0100_0002;
    pub const STREAM: u32 = 0x0100_0003;
    pub const SYSTEM: u32 = 0x0100_0004;
    pub const GENERIC_ASSET: u32 = 0x0100_0005;
    pub const VIRTUAL: u32 = 0x0300_0000;
    pub const DELETED: u32 = 0xffff_fffe;

    /// Decodes a raw flags value.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            Self::SIMPLE_ELEMENT => ElementKind::SimpleElement,
            Self::NESTED_CHILD => ElementKind::NestedChild,
            Self::NESTED_PARENT => ElementKind::NestedParent,
            Self::COMPOSITE_CHILD => ElementKind::CompositeChild,
            Self::COMPOSITE_PARENT => ElementKind::CompositeParent,
            Self::ROOM => ElementKind::Room,
            Self::FAMILY_TYPE => ElementKind::FamilyType,
            Self::LEVEL => ElementKind::Level,
            Self::DOCUMENT_ROOT => ElementKind::DocumentRoot,
            Self::STREAM => ElementKind::Stream,
            Self::SYSTEM => ElementKind::System,
            Self::GENERIC_ASSET => ElementKind::GenericAsset,
            Self::VIRTUAL => ElementKind::Virtual,
            Self::DELETED => ElementKind::Deleted,
            other => ElementKind::Unknown(other),
        }
    }

    /// Returns the raw flags value.
    pub fn raw(&self) -> u32 {
        match self {
            ElementKind::SimpleElement => Self::SIMPLE_ELEMENT,
            ElementKind::NestedChild => Self::NESTED_CHILD,
            ElementKind::NestedParent => Self::NESTED_PARENT,
            ElementKind::CompositeChild => Self::COMPOSITE_CHILD,
            ElementKind::CompositeParent => Self::COMPOSITE_PARENT,
            ElementKind::Room => Self::ROOM,
            ElementKind::FamilyType => Self::FAMILY_TYPE,
            ElementKind::Level => Self::LEVEL,
            ElementKind::DocumentRoot => Self::DOCUMENT_ROOT,
            ElementKind::Stream => Self::STREAM,
            ElementKind::System => Self::SYSTEM,
            ElementKind::GenericAsset => Self::GENERIC_ASSET,
            ElementKind::Virtual => Self::VIRTUAL,
            ElementKind::Deleted => Self::DELETED,
            ElementKind::Unknown(raw) => *raw,
        }
    }

    /// Returns `true` for kinds that can be members of a system.
    pub fn is_member_candidate(&self) -> bool {
        !matches!(self, ElementKind::System | ElementKind::Deleted)
    }
}
