//! Geographic primitives shared by every subsystem.
//!
//! These are plain data carriers. Geodesy math (haversine, geohash encoding,
//! margin expansion) lives in `tc-01-geospatial`.

use serde::{Deserialize, Serialize};

/// A single timestamped GPS sample from an activity track.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees (WGS84).
    pub lat: f64,
    /// Longitude in decimal degrees (WGS84).
    pub lon: f64,
    /// Elevation above sea level in meters.
    pub elevation_m: f64,
    /// Capture time as Unix milliseconds.
    pub timestamp_ms: u64,
}

impl GeoPoint {
    /// Create a point without elevation data.
    pub fn new(lat: f64, lon: f64, timestamp_ms: u64) -> Self {
        Self {
            lat,
            lon,
            elevation_m: 0.0,
            timestamp_ms,
        }
    }
}

/// Axis-aligned bounding box over a point track.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// Southernmost latitude.
    pub min_lat: f64,
    /// Westernmost longitude.
    pub min_lon: f64,
    /// Northernmost latitude.
    pub max_lat: f64,
    /// Easternmost longitude.
    pub max_lon: f64,
}

impl GeoBounds {
    /// Bounds containing a single point.
    pub fn around(point: &GeoPoint) -> Self {
        Self {
            min_lat: point.lat,
            min_lon: point.lon,
            max_lat: point.lat,
            max_lon: point.lon,
        }
    }

    /// Grow to include `point`.
    pub fn include(&mut self, point: &GeoPoint) {
        self.min_lat = self.min_lat.min(point.lat);
        self.min_lon = self.min_lon.min(point.lon);
        self.max_lat = self.max_lat.max(point.lat);
        self.max_lon = self.max_lon.max(point.lon);
    }

    /// Geometric center of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

/// Spatial deduplication key for a territory.
///
/// Fixed-precision geohash of the run's starting cell. Two runs that start in
/// the same cell intentionally collide; the collision IS the uniqueness rule.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geohash(pub String);

impl Geohash {
    /// Borrow the raw geohash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Geohash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Geohash {
    fn from(s: &str) -> Self {
        Geohash(s.to_string())
    }
}
