// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolver configuration.
//!
//! Loaded from environment variables for the loader knobs; the column layout
//! and class table come from [`ResolverConfig::default`] or a deserialized
//! config section.

use std::str::FromStr;
use std::time::Duration;

use facility_lite_core::{ClassTable, ColumnSchema};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ENV_MAX_CONCURRENT_SCANS: &str = "FACILITY_MAX_CONCURRENT_SCANS";
pub const ENV_SCAN_TIMEOUT_SECS: &str = "FACILITY_SCAN_TIMEOUT_SECS";

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Model scans in flight at once (1 = one model at a time).
    pub max_concurrent_scans: usize,
    /// Per-model scan timeout in seconds; `None` waits indefinitely.
    pub scan_timeout_secs: Option<u64>,
    /// Record column layout.
    pub columns: ColumnSchema,
    /// Ordered class names for bitmask decoding.
    pub class_table: ClassTable,
}

impl ResolverConfig {
    /// Load configuration from environment variables. A missing or
    /// unparseable variable leaves only its own field at the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        match env_concurrency() {
            Ok(Some(n)) => config.max_concurrent_scans = n,
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "Ignoring invalid scan concurrency"),
        }
        match env_scan_timeout() {
            Ok(Some(secs)) => config.scan_timeout_secs = secs,
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "Ignoring invalid scan timeout"),
        }
        config
    }

    /// Load configuration from environment variables, rejecting bad values.
    pub fn try_from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(n) = env_concurrency()? {
            config.max_concurrent_scans = n;
        }
        if let Some(secs) = env_scan_timeout()? {
            config.scan_timeout_secs = secs;
        }
        Ok(config)
    }

    /// Scan concurrency, never below one.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_scans.max(1)
    }

    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scan_timeout_secs.map(Duration::from_secs)
    }

    pub fn with_columns(mut self, columns: ColumnSchema) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_concurrency(mut self, max_concurrent_scans: usize) -> Self {
        self.max_concurrent_scans = max_concurrent_scans;
        self
    }

    pub fn with_scan_timeout_secs(mut self, secs: u64) -> Self {
        self.scan_timeout_secs = Some(secs);
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_concurrent_scans: 1,
            scan_timeout_secs: None,
            columns: ColumnSchema::default(),
            class_table: ClassTable::default(),
        }
    }
}

fn env_concurrency() -> Result<Option<usize>> {
    match env_parse::<usize>(ENV_MAX_CONCURRENT_SCANS)? {
        Some(0) => Err(Error::Config(format!(
            "{ENV_MAX_CONCURRENT_SCANS} must be at least 1"
        ))),
        n => Ok(n),
    }
}

/// `Some(None)` when the variable is set to 0, which disables the timeout.
fn env_scan_timeout() -> Result<Option<Option<u64>>> {
    Ok(env_parse::<u64>(ENV_SCAN_TIMEOUT_SECS)?.map(|secs| (secs > 0).then_some(secs)))
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{name}={raw:?}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sequential_without_timeout() {
        let config = ResolverConfig::default();
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.scan_timeout(), None);
        assert_eq!(config.class_table.len(), 26);
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let config = ResolverConfig::default().with_concurrency(0);
        assert_eq!(config.concurrency(), 1);
    }

    #[test]
    fn deserializes_partial_section() {
        let config: ResolverConfig = serde_json::from_str(
            r#"{"max_concurrent_scans": 4, "class_table": ["A", "B"], "columns": {"systems_family": "sys"}}"#,
        )
        .unwrap();
        assert_eq!(config.concurrency(), 4);
        assert_eq!(config.class_table.len(), 2);
        assert_eq!(config.columns.systems_family, "sys");
        assert_eq!(config.columns.name.standard, "n:n");
    }

    #[test]
    fn env_values_are_parsed() {
        // Only this test touches these variables.
        std::env::set_var(ENV_MAX_CONCURRENT_SCANS, "3");
        std::env::set_var(ENV_SCAN_TIMEOUT_SECS, "0");
        let config = ResolverConfig::try_from_env().unwrap();
        assert_eq!(config.concurrency(), 3);
        assert_eq!(config.scan_timeout(), None);

        std::env::set_var(ENV_MAX_CONCURRENT_SCANS, "many");
        assert!(matches!(
            ResolverConfig::try_from_env(),
            Err(Error::Config(_))
        ));
        assert_eq!(ResolverConfig::from_env().concurrency(), 1);

        std::env::set_var(ENV_SCAN_TIMEOUT_SECS, "30");
        let config = ResolverConfig::from_env();
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.scan_timeout(), Some(Duration::from_secs(30)));

        std::env::set_var(ENV_MAX_CONCURRENT_SCANS, "4");
        std::env::set_var(ENV_SCAN_TIMEOUT_SECS, "soon");
        let config = ResolverConfig::from_env();
        assert_eq!(config.concurrency(), 4);
        assert_eq!(config.scan_timeout(), None);

        std::env::set_var(ENV_MAX_CONCURRENT_SCANS, "0");
        std::env::set_var(ENV_SCAN_TIMEOUT_SECS, "12");
        let config = ResolverConfig::from_env();
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.scan_timeout_secs, Some(12));

        std::env::remove_var(ENV_MAX_CONCURRENT_SCANS);
        std::env::remove_var(ENV_SCAN_TIMEOUT_SECS);
    }
}
