//! Bounding-box expansion and planar area.

use shared_types::GeoBounds;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Expand a bounding box by a fixed margin in meters.
///
/// Longitude padding is scaled by cos(latitude) so the margin stays roughly
/// square away from the equator. The margin avoids edge-snapping artifacts
/// when the box is rendered.
pub fn expand_bounds(bounds: &GeoBounds, margin_m: f64) -> GeoBounds {
    let (center_lat, _) = bounds.center();

    let d_lat = margin_m / METERS_PER_DEGREE;
    let cos_lat = center_lat.to_radians().cos().abs().max(1e-6);
    let d_lon = margin_m / (METERS_PER_DEGREE * cos_lat);

    GeoBounds {
        min_lat: bounds.min_lat - d_lat,
        min_lon: bounds.min_lon - d_lon,
        max_lat: bounds.max_lat + d_lat,
        max_lon: bounds.max_lon + d_lon,
    }
}

/// Approximate area of a bounding box in square meters.
///
/// Planar approximation at the box center; good enough at run scale, where
/// boxes span at most a few kilometers.
pub fn bounds_area_m2(bounds: &GeoBounds) -> f64 {
    let (center_lat, _) = bounds.center();

    let height_m = bounds.lat_span() * METERS_PER_DEGREE;
    let width_m = bounds.lon_span() * METERS_PER_DEGREE * center_lat.to_radians().cos().abs();

    height_m * width_m
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::GeoPoint;

    fn box_around(lat: f64, lon: f64, span: f64) -> GeoBounds {
        let mut bounds = GeoBounds::around(&GeoPoint::new(lat, lon, 0));
        bounds.include(&GeoPoint::new(lat + span, lon + span, 1));
        bounds
    }

    #[test]
    fn test_expand_grows_every_edge() {
        let bounds = box_around(57.64, 10.40, 0.001);
        let expanded = expand_bounds(&bounds, 10.0);

        assert!(expanded.min_lat < bounds.min_lat);
        assert!(expanded.min_lon < bounds.min_lon);
        assert!(expanded.max_lat > bounds.max_lat);
        assert!(expanded.max_lon > bounds.max_lon);
    }

    #[test]
    fn test_expand_margin_is_metric() {
        let bounds = box_around(57.64, 10.40, 0.001);
        let expanded = expand_bounds(&bounds, 10.0);

        // 10 m of latitude is ~0.00009 degrees.
        let added_lat = bounds.min_lat - expanded.min_lat;
        assert!((added_lat - 10.0 / 111_320.0).abs() < 1e-9);
    }

    #[test]
    fn test_area_of_known_box() {
        // 0.001 deg x 0.001 deg at 57.64N: ~111.3 m x ~59.6 m.
        let bounds = box_around(57.64, 10.40, 0.001);
        let area = bounds_area_m2(&bounds);
        assert!(area > 6_000.0 && area < 7_500.0, "got {area}");
    }

    #[test]
    fn test_area_zero_for_point_box() {
        let bounds = box_around(57.64, 10.40, 0.0);
        assert_eq!(bounds_area_m2(&bounds), 0.0);
    }
}
