// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for system resolution.

/// Result type alias for system resolution.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by configuration and record decoding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An environment variable held an unusable value.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] facility_lite_core::Error),
}

/// A model scan that could not be completed.
///
/// Never aborts a facility load: the model is logged and contributes no
/// elements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("scan payload could not be parsed: {0}")]
    Parse(String),

    #[error("scan of model {model_id} timed out after {secs}s")]
    Timeout { model_id: String, secs: u64 },
}

impl From<facility_lite_core::Error> for ScanError {
    fn from(err: facility_lite_core::Error) -> Self {
        ScanError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Parse(err.to_string())
    }
}
