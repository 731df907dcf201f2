//! Run session lifecycle.
//!
//! A session is created when activity tracking starts, mutated only by
//! point appends, and becomes immutable once finalized.

use serde::{Deserialize, Serialize};
use shared_types::GeoPoint;
use tc_01_geospatial::{self as geo, GeoConfig, GeoError, SpatialKey};
use thiserror::Error;
use uuid::Uuid;

/// Errors from session lifecycle operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Appending to or re-finalizing a finalized session.
    #[error("Run session {0} is already finalized")]
    AlreadyFinalized(Uuid),

    /// Reading derived stats before finalize.
    #[error("Run session {0} is not finalized yet")]
    NotFinalized(Uuid),

    /// Finalize failed on the underlying track.
    #[error(transparent)]
    Geo(#[from] GeoError),
}

/// Derived fields computed exactly once, at finalize.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Total path length in meters.
    pub total_distance_m: f64,
    /// Wall-clock duration in seconds.
    pub duration_s: f64,
    /// Average speed in meters per second.
    pub avg_speed_mps: f64,
    /// Fastest inter-sample speed in meters per second.
    pub max_speed_mps: f64,
    /// Cumulative positive elevation change in meters.
    pub elevation_gain_m: f64,
    /// Whether the track returns to its start.
    pub loop_closed: bool,
    /// Geohash key and margin-expanded bounds.
    pub spatial: SpatialKey,
}

/// An activity track being recorded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSession {
    /// Session identifier, referenced by territory intents.
    pub id: Uuid,
    points: Vec<GeoPoint>,
    stats: Option<RunStats>,
}

impl RunSession {
    /// Start a new empty session.
    pub fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            stats: None,
        }
    }

    /// The recorded track so far.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Whether `finalize` has run.
    pub fn is_finalized(&self) -> bool {
        self.stats.is_some()
    }

    /// Append a GPS sample. Rejected once the session is finalized.
    pub fn append_point(&mut self, point: GeoPoint) -> Result<(), SessionError> {
        if self.is_finalized() {
            return Err(SessionError::AlreadyFinalized(self.id));
        }
        self.points.push(point);
        Ok(())
    }

    /// Close the session and compute derived stats.
    ///
    /// Idempotence is deliberately NOT provided: a second finalize is a
    /// caller bug and errors.
    pub fn finalize(&mut self, config: &GeoConfig) -> Result<&RunStats, SessionError> {
        if self.is_finalized() {
            return Err(SessionError::AlreadyFinalized(self.id));
        }

        let spatial = geo::encode(&self.points, config)?;
        let total_distance_m = geo::path_distance_m(&self.points);
        let loop_closed = geo::is_loop_closed(&self.points, config.loop_closure_threshold_m);

        let duration_s = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => {
                (last.timestamp_ms.saturating_sub(first.timestamp_ms)) as f64 / 1000.0
            }
            _ => 0.0,
        };

        let avg_speed_mps = if duration_s > 0.0 {
            total_distance_m / duration_s
        } else {
            0.0
        };

        let mut max_speed_mps = 0.0f64;
        let mut elevation_gain_m = 0.0f64;
        for pair in self.points.windows(2) {
            let dt_s = (pair[1].timestamp_ms.saturating_sub(pair[0].timestamp_ms)) as f64 / 1000.0;
            if dt_s > 0.0 {
                max_speed_mps = max_speed_mps.max(geo::haversine_m(&pair[0], &pair[1]) / dt_s);
            }
            let climb = pair[1].elevation_m - pair[0].elevation_m;
            if climb > 0.0 {
                elevation_gain_m += climb;
            }
        }

        tracing::info!(
            session_id = %self.id,
            distance_m = total_distance_m,
            loop_closed,
            geohash = %spatial.geohash,
            "[tc-02] Run session finalized"
        );

        Ok(self.stats.insert(RunStats {
            total_distance_m,
            duration_s,
            avg_speed_mps,
            max_speed_mps,
            elevation_gain_m,
            loop_closed,
            spatial,
        }))
    }

    /// Derived stats of a finalized session.
    pub fn stats(&self) -> Result<&RunStats, SessionError> {
        self.stats.as_ref().ok_or(SessionError::NotFinalized(self.id))
    }
}
