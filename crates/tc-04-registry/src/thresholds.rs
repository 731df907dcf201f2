//! Activity-point thresholds for territory defense status.

use serde::{Deserialize, Serialize};
use shared_types::TerritoryStatus;
use thiserror::Error;

/// Ordered, non-overlapping status thresholds.
///
/// Policy parameters, not derived values; construction validates ordering so
/// the banding function stays monotone.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StatusThresholds {
    /// Points at or above which a territory is fully defended.
    pub strong: u64,
    /// Points at or above which defense is moderate.
    pub moderate: u64,
    /// Points at or above which there is minimal defense.
    pub vulnerable: u64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            strong: 800,
            moderate: 500,
            vulnerable: 200,
        }
    }
}

/// Threshold ordering violation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Status thresholds must satisfy strong > moderate > vulnerable > 0 (got {strong}/{moderate}/{vulnerable})")]
pub struct ThresholdOrderingError {
    /// Configured strong threshold.
    pub strong: u64,
    /// Configured moderate threshold.
    pub moderate: u64,
    /// Configured vulnerable threshold.
    pub vulnerable: u64,
}

impl StatusThresholds {
    /// Validate strict ordering.
    pub fn validate(&self) -> Result<(), ThresholdOrderingError> {
        if self.strong > self.moderate && self.moderate > self.vulnerable && self.vulnerable > 0 {
            Ok(())
        } else {
            Err(ThresholdOrderingError {
                strong: self.strong,
                moderate: self.moderate,
                vulnerable: self.vulnerable,
            })
        }
    }

    /// Monotone banding from activity points to status.
    ///
    /// Never yields `Claimed`; that value only exists on freshly minted
    /// records that have not been recomputed yet.
    pub fn status_for(&self, activity_points: u64) -> TerritoryStatus {
        if activity_points >= self.strong {
            TerritoryStatus::Strong
        } else if activity_points >= self.moderate {
            TerritoryStatus::Moderate
        } else if activity_points >= self.vulnerable {
            TerritoryStatus::Vulnerable
        } else {
            TerritoryStatus::Claimable
        }
    }
}
