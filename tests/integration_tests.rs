//! Integration tests for the social distance pipeline.
//!
//! These tests drive the full flow: calibration file -> coordinate converter
//! -> per-frame ground-truth tracks -> violation engine.

use std::collections::BTreeSet;
use std::io::Write;

use social_distance_rs::{
    CalibrationFile, CalibrationSource, CameraParameters, CoordinateConverter, GroundTruthFile,
    ScenePoint, SocialDistanceConfig, SocialDistanceMonitor, TrackSource, ViolatorPair,
};
use tempfile::NamedTempFile;

// =============================================================================
// Fixtures
// =============================================================================

const TOWNCENTRE_CALIBRATION: &[(&str, f64)] = &[
    ("FocalLengthX", 2696.35888671875),
    ("FocalLengthY", 2696.35888671875),
    ("PrincipalPointX", 959.5),
    ("PrincipalPointY", 539.5),
    ("Skew", 0.0),
    ("TranslationX", -0.05988363921642303467),
    ("TranslationY", 3.83331298828125),
    ("TranslationZ", 12.39112186431884765625),
    ("RotationX", 0.69724917918208628720),
    ("RotationY", -0.43029624469563848566),
    ("RotationZ", 0.28876888503799524877),
    ("RotationW", 0.49527896681027261394),
    ("DistortionK1", -0.60150605440139770508),
    ("DistortionK2", 4.70203733444213867188),
    ("DistortionP1", -0.00047452122089453042),
    ("DistortionP2", -0.00782289821654558182),
];

fn write_calibration_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for (key, value) in TOWNCENTRE_CALIBRATION {
        writeln!(file, "{} = {}", key, value).unwrap();
    }
    file
}

/// Write a ground-truth file whose body boxes put each person's foot pixel at
/// the projection of the given scene position.
fn write_groundtruth_file(
    converter: &CoordinateConverter,
    tracks: &[(i32, usize, ScenePoint)],
) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for &(id, frame, scene) in tracks {
        let foot = converter.to_image(&scene).unwrap();
        let (x1, y1, x2, y2) = (foot.x - 15.0, foot.y - 80.0, foot.x + 15.0, foot.y);
        writeln!(
            file,
            "{},{},1,1,{},{},{},{},{},{},{},{}",
            id,
            frame,
            x1,
            y1 - 10.0,
            x2,
            y1,
            x1,
            y1,
            x2,
            y2
        )
        .unwrap();
    }
    file
}

// =============================================================================
// Test 1: Complete Monitoring Pipeline
// =============================================================================

#[test]
fn test_integration_complete_monitoring_pipeline() {
    let _ = env_logger::builder().is_test(true).try_init();

    let calibration_file = write_calibration_file();
    let calibration = CalibrationFile::load(calibration_file.path()).unwrap();
    let converter = CoordinateConverter::new(
        CameraParameters::from_map(calibration.parameters()).unwrap(),
    );

    // Two people start ~4 scene units apart, person 2 walks toward person 1
    // and stays close from frame 2 onward; person 3 keeps their distance.
    let mut tracks = Vec::new();
    for frame in 0..6usize {
        let approach = (4.0 - frame as f64).max(1.0);
        tracks.push((1, frame, ScenePoint::new(0.0, 0.0, 0.0)));
        tracks.push((2, frame, ScenePoint::new(0.0, approach, 0.0)));
        tracks.push((3, frame, ScenePoint::new(7.0, -4.0, 0.0)));
    }

    let groundtruth_file = write_groundtruth_file(&converter, &tracks);
    let groundtruth = GroundTruthFile::load(groundtruth_file.path()).unwrap();
    assert_eq!(groundtruth.num_frames(), 6);

    let mut monitor = SocialDistanceMonitor::from_calibration(
        &calibration,
        SocialDistanceConfig::new(2.0, 3, 0.5),
    )
    .unwrap();

    let mut first_flagged_frame = None;
    for frame in 0..groundtruth.num_frames() {
        let summary = monitor
            .process_frame(frame, groundtruth.tracked_entities(frame))
            .unwrap();

        if first_flagged_frame.is_none() && !summary.violator_pairs.is_empty() {
            first_flagged_frame = Some(frame);
            assert_eq!(
                summary.new_violator_pairs,
                summary.violator_pairs,
                "the first flagged frame should report the pair as new"
            );
        }

        // Person 3 never violates.
        assert!(!summary.violators.contains(&3), "frame {}: person 3 flagged", frame);
    }

    // Distances: 4.0, 3.0, 2.0, 1.0, 1.0, 1.0 -- with a 3-frame window and a
    // 0.5 fraction the pair is first flagged at frame 4 (frames 3 and 4 are
    // strictly below the threshold; frame 2 is exactly 2.0 and so is not).
    assert_eq!(first_flagged_frame, Some(4));

    let engine = monitor.engine_mut();
    assert_eq!(
        *engine.current_violator_pairs(5).unwrap(),
        BTreeSet::from([ViolatorPair::new(1, 2)])
    );
    assert!(engine.new_current_violator_pairs(5).unwrap().is_empty());

    // Point distance queries reproduce the staged geometry.
    let d0 = engine.distance_for(0, 1, 2).unwrap();
    let d5 = engine.distance_for(5, 1, 2).unwrap();
    assert!((d0 - 4.0).abs() < 1e-4, "frame 0 distance was {}", d0);
    assert!((d5 - 1.0).abs() < 1e-4, "frame 5 distance was {}", d5);
    assert_eq!(engine.distance_for(5, 1, 3).map(|d| d < 2.0), Some(false));
}

// =============================================================================
// Test 2: Calibration Source Round Trip
// =============================================================================

#[test]
fn test_integration_calibration_source_matches_direct_parameters() {
    let calibration_file = write_calibration_file();
    let calibration = CalibrationFile::load(calibration_file.path()).unwrap();

    let from_source =
        CameraParameters::from_map(&calibration.camera_parameters().unwrap()).unwrap();
    let direct = CameraParameters::from_map(calibration.parameters()).unwrap();
    assert_eq!(from_source, direct);

    // The loaded calibration produces a working ground-plane bijection.
    let converter = CoordinateConverter::new(direct);
    let scene = ScenePoint::new(-2.0, -2.0, 0.0);
    let image = converter.to_image(&scene).unwrap();
    let back = converter.to_scene(&image).unwrap();
    assert!((back.x - scene.x).abs() < 1e-6);
    assert!((back.y - scene.y).abs() < 1e-6);
    assert_eq!(back.z, 0.0);
}

// =============================================================================
// Test 3: Sparse Tracks Across Frames
// =============================================================================

#[test]
fn test_integration_identities_entering_and_leaving() {
    let calibration_file = write_calibration_file();
    let calibration = CalibrationFile::load(calibration_file.path()).unwrap();
    let converter = CoordinateConverter::new(
        CameraParameters::from_map(calibration.parameters()).unwrap(),
    );

    // Person 2 is only present at frames 2 and 3; the pair is close both
    // times, but the 4-frame window denominator counts frames 0-3.
    let tracks = [
        (1, 0, ScenePoint::new(0.0, 0.0, 0.0)),
        (1, 1, ScenePoint::new(0.0, 0.0, 0.0)),
        (1, 2, ScenePoint::new(0.0, 0.0, 0.0)),
        (2, 2, ScenePoint::new(0.0, 0.5, 0.0)),
        (1, 3, ScenePoint::new(0.0, 0.0, 0.0)),
        (2, 3, ScenePoint::new(0.0, 0.5, 0.0)),
    ];
    let groundtruth_file = write_groundtruth_file(&converter, &tracks);
    let groundtruth = GroundTruthFile::load(groundtruth_file.path()).unwrap();

    let mut monitor = SocialDistanceMonitor::from_calibration(
        &calibration,
        SocialDistanceConfig::new(2.0, 4, 0.5),
    )
    .unwrap();

    let mut last_summary = None;
    for frame in 0..groundtruth.num_frames() {
        last_summary = Some(
            monitor
                .process_frame(frame, groundtruth.tracked_entities(frame))
                .unwrap(),
        );
    }

    // 2 close samples over a 4-frame window: 2/4 >= 0.5 flags the pair at
    // frame 3, even though it first co-occurred at frame 2.
    let summary = last_summary.unwrap();
    assert_eq!(
        summary.violator_pairs,
        BTreeSet::from([ViolatorPair::new(1, 2)])
    );
    assert_eq!(summary.violators, BTreeSet::from([1, 2]));

    // At frame 2 the same pair was still below the fraction: 1/3 < 0.5.
    assert!(monitor
        .engine_mut()
        .current_violator_pairs(2)
        .unwrap()
        .is_empty());
}
