//! # TC-01 Geospatial Encoding
//!
//! Turns a GPS point track into a stable spatial identifier and bounding shape.
//!
//! **Subsystem ID:** 01
//!
//! ## Purpose
//!
//! - Fixed-precision geohash of the run's starting cell (the spatial
//!   deduplication key: two runs starting in the same cell collide on purpose)
//! - Minimal enclosing bounds with a small fixed margin
//! - Loop-closure detection between track endpoints
//!
//! ## Module Structure
//!
//! ```text
//! tc-01-geospatial/
//! ├── bounds.rs        # box expansion and planar area
//! ├── distance.rs      # haversine and path length
//! └── geohash.rs       # base32 cell encoding
//! ```
//!
//! Everything here is a pure function over the input points; no state.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bounds;
pub mod distance;
pub mod geohash;

pub use bounds::{bounds_area_m2, expand_bounds};
pub use distance::{haversine_m, path_distance_m};
pub use geohash::encode_cell;

use serde::{Deserialize, Serialize};
use shared_types::{GeoBounds, GeoPoint, Geohash};
use thiserror::Error;

/// Geospatial policy parameters.
///
/// These are policy constants, not derived values: precision fixes the
/// collision cell size, and the closure threshold applies to runs of any
/// length.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeoConfig {
    /// Geohash precision in characters.
    pub geohash_precision: usize,
    /// Max distance between first and last point for a closed loop, meters.
    pub loop_closure_threshold_m: f64,
    /// Margin added around the minimal bounding box, meters.
    pub bounds_margin_m: f64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            geohash_precision: 11,
            loop_closure_threshold_m: 100.0,
            bounds_margin_m: 10.0,
        }
    }
}

/// Errors from geospatial encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeoError {
    /// The track has no points to encode.
    #[error("Cannot encode an empty point track")]
    EmptyTrack,
}

/// Spatial identity of a run: deduplication key plus render bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialKey {
    /// Fixed-precision geohash of the starting cell.
    pub geohash: Geohash,
    /// Minimal enclosing box over all points, margin-expanded.
    pub bounds: GeoBounds,
}

/// Encode a point track into its spatial key.
///
/// Deterministic: the same track always yields the same geohash and bounds.
/// The geohash covers the FIRST point only, so any run starting in the same
/// cell maps to the same territory key.
pub fn encode(points: &[GeoPoint], config: &GeoConfig) -> Result<SpatialKey, GeoError> {
    let first = points.first().ok_or(GeoError::EmptyTrack)?;

    let geohash = Geohash(encode_cell(first.lat, first.lon, config.geohash_precision));

    let mut bounds = GeoBounds::around(first);
    for point in &points[1..] {
        bounds.include(point);
    }
    let bounds = expand_bounds(&bounds, config.bounds_margin_m);

    tracing::debug!(
        "[tc-01] Encoded {} points to cell {} ({} chars)",
        points.len(),
        geohash,
        config.geohash_precision
    );

    Ok(SpatialKey { geohash, bounds })
}

/// Check whether the track returns to its start.
///
/// Degenerate input (fewer than 2 points) is simply not a closed loop; this
/// never errors. The threshold is independent of run length.
pub fn is_loop_closed(points: &[GeoPoint], threshold_m: f64) -> bool {
    let (first, last) = match (points.first(), points.last()) {
        (Some(f), Some(l)) if points.len() >= 2 => (f, l),
        _ => return false,
    };

    haversine_m(first, last) <= threshold_m
}
