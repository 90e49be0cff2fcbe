// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element key encodings.
//!
//! Scans hand out *short* keys: URL-safe base64 of the element id bytes. A
//! *full* key prefixes those bytes with the 4-byte big-endian element flags.
//! A system's id is derived from its full key and is the code member elements
//! use in their system-reference columns.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::flags::ElementKind;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// URL-safe alphabet, no padding on output, padding optional on input.
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Bytes behind a short key. Keys that aren't canonical base64 use their
/// UTF-8 bytes.
pub fn short_key_bytes(short_key: &str) -> Vec<u8> {
    KEY_ENGINE
        .decode(short_key)
        .unwrap_or_else(|_| short_key.as_bytes().to_vec())
}

/// Encodes element id bytes as a short key.
pub fn to_short_key(bytes: &[u8]) -> String {
    KEY_ENGINE.encode(bytes)
}

/// Full-key bytes: big-endian flags followed by the short-key bytes.
pub fn to_full_key(short_key: &str, kind: ElementKind) -> Vec<u8> {
    let id = short_key_bytes(short_key);
    let mut full = Vec::with_capacity(4 + id.len());
    full.extend_from_slice(&kind.raw().to_be_bytes());
    full.extend_from_slice(&id);
    full
}

/// Derives the system id for a system element's short key.
///
/// The full key is hashed with 32-bit FNV-1a, then the big-endian hash is
/// encoded as 6 URL-safe base64 characters. The result is the same on every
/// target.
pub fn system_id_for_key(short_key: &str) -> String {
    let full = to_full_key(short_key, ElementKind::System);
    KEY_ENGINE.encode(fnv1a_32(&full).to_be_bytes())
}

fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
