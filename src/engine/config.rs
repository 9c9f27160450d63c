//! Engine-wide settings that persist across searches.

use super::error::ConfigError;
use super::time::TimeConfig;
use crate::board::search::SearchParams;

pub const MIN_THREADS: usize = 1;
pub const MAX_THREADS: usize = 256;
pub const MIN_HASH_MB: usize = 1;
pub const MAX_HASH_MB: usize = 65_536;
pub const DEFAULT_HASH_MB: usize = 64;

/// Default piece-count ceiling for tablebase probes (kings included).
pub const DEFAULT_TB_PROBE_LIMIT: u32 = 7;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub threads: usize,
    pub hash_mb: usize,
    /// Clear the transposition table before every search.
    pub clean_search: bool,
    /// Probe tablebases only at or below this many pieces.
    pub tb_probe_limit: u32,
    pub time: TimeConfig,
    pub params: SearchParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            threads: 1,
            hash_mb: DEFAULT_HASH_MB,
            clean_search: false,
            tb_probe_limit: DEFAULT_TB_PROBE_LIMIT,
            time: TimeConfig::default(),
            params: SearchParams::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_hash_mb(mut self, hash_mb: usize) -> Self {
        self.hash_mb = hash_mb;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_threads(self.threads)?;
        validate_hash_mb(self.hash_mb)
    }
}

pub(crate) fn validate_threads(threads: usize) -> Result<(), ConfigError> {
    if (MIN_THREADS..=MAX_THREADS).contains(&threads) {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreads {
            requested: threads,
            max: MAX_THREADS,
        })
    }
}

pub(crate) fn validate_hash_mb(hash_mb: usize) -> Result<(), ConfigError> {
    if (MIN_HASH_MB..=MAX_HASH_MB).contains(&hash_mb) {
        Ok(())
    } else {
        Err(ConfigError::InvalidHashSize {
            requested_mb: hash_mb,
            max_mb: MAX_HASH_MB,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            EngineConfig::default().with_threads(0).validate(),
            Err(ConfigError::InvalidThreads { requested: 0, .. })
        ));
        assert!(matches!(
            EngineConfig::default().with_threads(MAX_THREADS + 1).validate(),
            Err(ConfigError::InvalidThreads { .. })
        ));
        assert!(matches!(
            EngineConfig::default().with_hash_mb(0).validate(),
            Err(ConfigError::InvalidHashSize { .. })
        ));
        assert!(EngineConfig::default()
            .with_threads(MAX_THREADS)
            .with_hash_mb(MIN_HASH_MB)
            .validate()
            .is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_partial_config() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"threads": 4, "time": {"move_overhead_ms": 100}}"#).unwrap();
        assert_eq!(config.threads, 4);
        assert_eq!(config.hash_mb, DEFAULT_HASH_MB);
        assert_eq!(config.time.move_overhead_ms, 100);
        assert_eq!(config.time.soft_time_percent, TimeConfig::default().soft_time_percent);
    }
}
