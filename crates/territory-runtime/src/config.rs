//! Aggregated runtime configuration.
//!
//! Every policy constant in the system lives in one of the per-subsystem
//! config structs collected here. Defaults are production values; tests
//! override individual fields.

use tc_01_geospatial::GeoConfig;
use tc_02_eligibility::EligibilityConfig;
use tc_03_claims::{ClaimConfig, ClaimError};
use tc_04_registry::{StatusThresholds, ThresholdOrderingError};
use tc_05_cross_chain::dedup::DEFAULT_SEEN_CAPACITY;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Claim policy outside safety bounds.
    #[error(transparent)]
    Claims(#[from] ClaimError),

    /// Status thresholds not strictly ordered.
    #[error(transparent)]
    Thresholds(#[from] ThresholdOrderingError),

    /// A geospatial parameter is out of range.
    #[error("Invalid geospatial config: {0}")]
    Geo(String),

    /// A cross-chain parameter is out of range.
    #[error("Invalid cross-chain config: {0}")]
    CrossChain(String),
}

/// Top-level configuration for one runtime instance.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Geohash precision, loop closure threshold, bounds margin.
    pub geo: GeoConfig,
    /// Claim eligibility gates and scoring parameters.
    pub eligibility: EligibilityConfig,
    /// Claim TTL, gas buffer, receipt timeout, origin chain.
    pub claims: ClaimConfig,
    /// Activity-point bands for territory status.
    pub thresholds: StatusThresholds,
    /// Size of the applied-message dedup window.
    pub message_window: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            geo: GeoConfig::default(),
            eligibility: EligibilityConfig::default(),
            claims: ClaimConfig::default(),
            thresholds: StatusThresholds::default(),
            message_window: DEFAULT_SEEN_CAPACITY,
        }
    }
}

impl RuntimeConfig {
    /// Validate every section before any subsystem is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.claims.validate()?;
        self.thresholds.validate()?;

        if self.geo.geohash_precision == 0 || self.geo.geohash_precision > 12 {
            return Err(ConfigError::Geo(format!(
                "geohash precision {} outside 1..=12",
                self.geo.geohash_precision
            )));
        }
        if self.geo.loop_closure_threshold_m <= 0.0 {
            return Err(ConfigError::Geo(
                "loop closure threshold must be positive".to_string(),
            ));
        }
        if self.message_window == 0 {
            return Err(ConfigError::CrossChain(
                "message window must hold at least one id".to_string(),
            ));
        }
        Ok(())
    }
}
