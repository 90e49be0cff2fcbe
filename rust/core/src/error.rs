// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for record decoding.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding element records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A string could not be parsed as `family:code` or `family:!code`.
    #[error("invalid qualified column: {0:?}")]
    InvalidColumn(String),

    /// A scan payload was not valid element-record JSON.
    #[error("record decode error: {0}")]
    Json(#[from] serde_json::Error),
}
