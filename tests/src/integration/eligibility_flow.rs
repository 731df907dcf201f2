//! GPS track through spatial encoding to an eligibility verdict.
//!
//! Exercises tc-01 and tc-02 together on realistic tracks: a qualifying
//! square loop, a short loop, an open path, and an out-and-back line.

#[cfg(test)]
mod tests {
    use shared_types::GeoPoint;
    use tc_01_geospatial::{encode, GeoConfig};
    use tc_02_eligibility::{evaluate, EligibilityConfig, IneligibleReason, RunSession};

    /// Reference start point: (57.64911, 10.40744), cell "u4pruydqqvj".
    const START: (f64, f64) = (57.64911, 10.40744);

    fn session_from(track: &[(f64, f64)]) -> RunSession {
        let mut session = RunSession::start();
        for (i, (lat, lon)) in track.iter().enumerate() {
            session
                .append_point(GeoPoint::new(*lat, *lon, i as u64 * 30_000))
                .unwrap();
        }
        session.finalize(&GeoConfig::default()).unwrap();
        session
    }

    /// ~1200 m square loop ending ~6 m from its start.
    fn qualifying_loop() -> Vec<(f64, f64)> {
        vec![
            START,
            (57.65181, 10.40744),
            (57.65181, 10.41247),
            (57.64911, 10.41247),
            (57.64916, 10.40749),
        ]
    }

    #[test]
    fn test_qualifying_loop_is_eligible_with_fixed_geohash() {
        let session = session_from(&qualifying_loop());
        let stats = session.stats().unwrap();

        assert!(stats.total_distance_m > 1_000.0);
        assert!(stats.loop_closed);
        assert_eq!(stats.spatial.geohash.as_str(), "u4pruydqqvj");

        let result = evaluate(&session, &EligibilityConfig::default()).unwrap();
        assert!(result.eligible);
        let metadata = result.metadata.unwrap();
        assert!(metadata.difficulty <= 100);
        assert!(metadata.estimated_reward >= stats.total_distance_m as u64);
    }

    #[test]
    fn test_encoding_is_deterministic_across_sessions() {
        let a = session_from(&qualifying_loop());
        let b = session_from(&qualifying_loop());

        assert_eq!(
            a.stats().unwrap().spatial.geohash,
            b.stats().unwrap().spatial.geohash
        );
        assert_eq!(a.stats().unwrap().spatial.bounds, b.stats().unwrap().spatial.bounds);
    }

    #[test]
    fn test_same_starting_cell_collides_on_purpose() {
        // Two different loops from the same start share the dedup key.
        let other_loop = vec![
            START,
            (57.65100, 10.40744),
            (57.65100, 10.41100),
            (57.64911, 10.41100),
            (57.64915, 10.40749),
        ];
        let first = session_from(&qualifying_loop());
        let second = session_from(&other_loop);
        let a = encode(first.points(), &GeoConfig::default()).unwrap();
        let b = encode(second.points(), &GeoConfig::default()).unwrap();

        assert_eq!(a.geohash, b.geohash);
        assert_ne!(a.bounds, b.bounds);
    }

    #[test]
    fn test_short_closed_loop_reports_too_short() {
        // ~120 m loop: closed but below the 500 m gate.
        let session = session_from(&[
            START,
            (57.64938, 10.40744),
            (57.64938, 10.40794),
            (57.64911, 10.40744),
        ]);
        let result = evaluate(&session, &EligibilityConfig::default()).unwrap();

        assert!(!result.eligible);
        assert!(matches!(result.reason, Some(IneligibleReason::TooShort { .. })));
    }

    #[test]
    fn test_long_open_path_reports_not_closed() {
        // ~900 m of track ending ~600 m from the start.
        let session = session_from(&[START, (57.65181, 10.40744), (57.65181, 10.41247)]);
        let result = evaluate(&session, &EligibilityConfig::default()).unwrap();

        assert_eq!(result.reason, Some(IneligibleReason::NotClosedLoop));
    }

    #[test]
    fn test_out_and_back_line_reports_degenerate() {
        let session = session_from(&[
            START,
            (57.65181, 10.40744),
            START,
            (57.65181, 10.40744),
            START,
        ]);
        let result = evaluate(&session, &EligibilityConfig::default()).unwrap();

        assert!(matches!(
            result.reason,
            Some(IneligibleReason::DegeneratePath { .. })
        ));
    }

    #[test]
    fn test_loop_threshold_is_absolute_not_relative() {
        // Endpoints ~150 m apart: open at the default 100 m threshold no
        // matter how long the track is.
        let mut track = qualifying_loop();
        track.pop();
        track.push((57.65046, 10.40744));
        let session = session_from(&track);

        assert!(!session.stats().unwrap().loop_closed);
    }
}
