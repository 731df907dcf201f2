//! Claim eligibility evaluation and metadata derivation.
//!
//! Everything here is a pure function over a finalized `RunSession`; the same
//! input always produces the same verdict and metadata.

use crate::session::{RunSession, RunStats, SessionError};
use serde::{Deserialize, Serialize};
use shared_types::{GeoBounds, Rarity, TerritoryMetadata};
use std::collections::BTreeSet;
use tc_01_geospatial::{bounds_area_m2, encode_cell};
use thiserror::Error;

/// Eligibility policy parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Minimum total path length for a claim, meters.
    pub min_distance_m: f64,
    /// Minimum bounding-box area per path meter; rejects near-zero-area
    /// back-and-forth tracks.
    pub min_area_per_meter_m2: f64,
    /// Geohash precision for counting distinct cells visited (the landmark
    /// proxy feeding difficulty).
    pub landmark_cell_precision: usize,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            min_distance_m: 500.0,
            min_area_per_meter_m2: 10.0,
            landmark_cell_precision: 7,
        }
    }
}

/// Why a run does not qualify for a claim.
#[derive(Clone, Debug, Error, PartialEq, Serialize, Deserialize)]
pub enum IneligibleReason {
    /// Path length below the claim minimum.
    #[error("Run too short: {distance_m:.0} m of {min_m:.0} m required")]
    TooShort {
        /// Measured path length.
        distance_m: f64,
        /// Configured minimum.
        min_m: f64,
    },

    /// Track does not return to its start.
    #[error("Run is not a closed loop")]
    NotClosedLoop,

    /// Track encloses almost no area (a back-and-forth line).
    #[error("Run path is degenerate: {area_per_meter:.1} m²/m of {min:.1} m²/m required")]
    DegeneratePath {
        /// Measured bounding-box area per path meter.
        area_per_meter: f64,
        /// Configured minimum.
        min: f64,
    },
}

/// Verdict of an eligibility evaluation.
///
/// Ineligible runs always carry a reason; eligible runs always carry metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    /// Whether the run qualifies for a territory claim.
    pub eligible: bool,
    /// Populated iff ineligible.
    pub reason: Option<IneligibleReason>,
    /// Populated iff eligible.
    pub metadata: Option<TerritoryMetadata>,
}

impl EligibilityResult {
    fn ineligible(reason: IneligibleReason) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
            metadata: None,
        }
    }

    fn eligible(metadata: TerritoryMetadata) -> Self {
        Self {
            eligible: true,
            reason: None,
            metadata: Some(metadata),
        }
    }
}

/// Evaluate a finalized run for claim eligibility.
///
/// Gate order is fixed: distance, loop closure, degeneracy. A short run
/// reports `TooShort` regardless of whether it closed its loop. A run with
/// no points at all is a zero-distance `TooShort` verdict, not a lifecycle
/// error.
pub fn evaluate(
    session: &RunSession,
    config: &EligibilityConfig,
) -> Result<EligibilityResult, SessionError> {
    if session.points().is_empty() {
        return Ok(EligibilityResult::ineligible(IneligibleReason::TooShort {
            distance_m: 0.0,
            min_m: config.min_distance_m,
        }));
    }

    let stats = session.stats()?;

    if stats.total_distance_m < config.min_distance_m {
        return Ok(EligibilityResult::ineligible(IneligibleReason::TooShort {
            distance_m: stats.total_distance_m,
            min_m: config.min_distance_m,
        }));
    }

    if !stats.loop_closed {
        return Ok(EligibilityResult::ineligible(IneligibleReason::NotClosedLoop));
    }

    // Degeneracy is judged on the raw track box, not the margin-expanded
    // render bounds, so the margin cannot mask a zero-area path.
    let area_per_meter = raw_bounds_area_m2(session) / stats.total_distance_m;
    if area_per_meter < config.min_area_per_meter_m2 {
        return Ok(EligibilityResult::ineligible(
            IneligibleReason::DegeneratePath {
                area_per_meter,
                min: config.min_area_per_meter_m2,
            },
        ));
    }

    let metadata = derive_metadata(session, stats, config);
    tracing::info!(
        session_id = %session.id,
        geohash = %stats.spatial.geohash,
        difficulty = metadata.difficulty,
        rarity = ?metadata.rarity,
        "[tc-02] Run eligible for claim"
    );

    Ok(EligibilityResult::eligible(metadata))
}

/// Activity points a confirmed run contributes to its territory.
pub fn activity_points_for(stats: &RunStats, metadata: &TerritoryMetadata) -> u64 {
    (stats.total_distance_m / 10.0).round() as u64 + 2 * u64::from(metadata.difficulty)
}

fn raw_bounds_area_m2(session: &RunSession) -> f64 {
    let points = session.points();
    let mut bounds = match points.first() {
        Some(first) => GeoBounds::around(first),
        None => return 0.0,
    };
    for point in &points[1..] {
        bounds.include(point);
    }
    bounds_area_m2(&bounds)
}

fn derive_metadata(
    session: &RunSession,
    stats: &RunStats,
    config: &EligibilityConfig,
) -> TerritoryMetadata {
    let difficulty = difficulty_score(session, stats, config);
    let rarity = rarity_band(stats.total_distance_m, difficulty);
    let estimated_reward = estimated_reward(stats.total_distance_m, difficulty);

    let geohash = stats.spatial.geohash.as_str();
    let cell = &geohash[..geohash.len().min(7)];

    TerritoryMetadata {
        name: format!("Territory {cell}"),
        rarity,
        difficulty,
        estimated_reward,
    }
}

/// Difficulty in 0..=100 from distance, climb, and distinct cells visited.
fn difficulty_score(session: &RunSession, stats: &RunStats, config: &EligibilityConfig) -> u8 {
    let distance_score = (stats.total_distance_m / 5_000.0 * 60.0).min(60.0);
    let climb_score = (stats.elevation_gain_m / 100.0 * 25.0).min(25.0);

    let cells: BTreeSet<String> = session
        .points()
        .iter()
        .map(|p| encode_cell(p.lat, p.lon, config.landmark_cell_precision))
        .collect();
    let landmark_score = (cells.len() as f64 * 3.0).min(15.0);

    (distance_score + climb_score + landmark_score).round().clamp(0.0, 100.0) as u8
}

/// Ordered banding over distance and difficulty.
fn rarity_band(distance_m: f64, difficulty: u8) -> Rarity {
    let score = f64::from(difficulty) + (distance_m / 1_000.0 * 10.0).min(50.0);
    match score {
        s if s < 25.0 => Rarity::Common,
        s if s < 45.0 => Rarity::Uncommon,
        s if s < 65.0 => Rarity::Rare,
        s if s < 85.0 => Rarity::Epic,
        _ => Rarity::Legendary,
    }
}

/// Monotone in both distance and difficulty.
fn estimated_reward(distance_m: f64, difficulty: u8) -> u64 {
    (distance_m * (1.0 + f64::from(difficulty) / 100.0)).round() as u64
}
