// Unit tests for business rules

use std::path::{Path, PathBuf};

use super::*;

fn size(width: i64, height: i64) -> FrameSize {
    FrameSize::new(width, height).unwrap()
}

fn metadata(width: u32, height: u32, duration: f64) -> MediaMetadata {
    MediaMetadata {
        path: PathBuf::from("/videos/talk.mp4"),
        format: "mov,mp4,m4a,3gp,3g2,mj2".to_string(),
        duration,
        width,
        height,
        fps: Some(29.97),
        rotation: None,
        file_size: 1_000_000,
    }
}

#[test]
fn test_clamp_to_source_bounds() {
    let window = WindowClamp::default().clamp(0.0, 100.0, 10.0).unwrap();
    assert_eq!((window.start(), window.end()), (0.0, 10.0));

    let window = WindowClamp::default().clamp(-5.0, 120.0, 100.0).unwrap();
    assert_eq!((window.start(), window.end()), (0.0, 100.0));
}

#[test]
fn test_clamp_is_order_independent() {
    let clamp = WindowClamp::default();
    assert_eq!(clamp.clamp(5.0, 2.0, 10.0), clamp.clamp(2.0, 5.0, 10.0));
}

#[test]
fn test_clamp_is_idempotent() {
    let clamp = WindowClamp::default();
    for (start, end, duration) in [
        (2.0, 5.0, 10.0),
        (0.1234567, 7.654321, 9.87654321),
        (-3.0, 1e9, 42.4242),
        (3.3333, 3.9, 3.95),
    ] {
        let once = clamp.clamp(start, end, duration).unwrap();
        let twice = clamp.clamp(once.start(), once.end(), duration).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_clamp_start_at_source_end_is_empty() {
    let err = WindowClamp::default().clamp(10.0, 20.0, 10.0).unwrap_err();
    assert!(matches!(err, PlanError::EmptyWindow { .. }));

    let err = WindowClamp::default().clamp(10.0, 10.1, 10.0).unwrap_err();
    assert!(matches!(err, PlanError::EmptyWindow { .. }));
}

#[test]
fn test_clamp_window_entirely_before_source_is_empty() {
    let err = WindowClamp::default().clamp(-3.0, -1.0, 10.0).unwrap_err();
    assert!(matches!(err, PlanError::EmptyWindow { .. }));
}

#[test]
fn test_clamp_rejects_invalid_source() {
    for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = WindowClamp::default().clamp(0.0, 1.0, duration).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSource { .. }));
    }
}

#[test]
fn test_clamp_rejects_nan_bounds() {
    let clamp = WindowClamp::default();
    assert_eq!(
        clamp.clamp(f64::NAN, 1.0, 10.0),
        Err(PlanError::InvalidTimestamp { bound: "start" })
    );
    assert_eq!(
        clamp.clamp(1.0, f64::NAN, 10.0),
        Err(PlanError::InvalidTimestamp { bound: "end" })
    );
}

#[test]
fn test_clamp_infinite_bounds_cover_source() {
    let window = WindowClamp::default()
        .clamp(f64::NEG_INFINITY, f64::INFINITY, 12.5)
        .unwrap();
    assert_eq!((window.start(), window.end()), (0.0, 12.5));
}

#[test]
fn test_clamp_rejects_short_windows() {
    let err = WindowClamp::default().clamp(1.0, 1.2, 10.0).unwrap_err();
    assert!(matches!(err, PlanError::WindowTooShort { .. }));

    // Exactly the minimum is accepted even with float noise in the subtraction
    assert!(WindowClamp::default().clamp(9.6, 10.1, 20.0).is_ok());

    let relaxed = WindowClamp::new(&PlanLimits {
        min_window_secs: 0.1,
        ..PlanLimits::default()
    });
    assert!(relaxed.clamp(1.0, 1.2, 10.0).is_ok());
}

#[test]
fn test_clamp_rounds_to_millis_inside_source() {
    let window = WindowClamp::default().clamp(1.23449, 5.0, 5.0004).unwrap();
    assert_eq!(window.start(), 1.234);
    assert_eq!(window.end(), 5.0);

    // Rounding up must never leave the source
    let window = WindowClamp::default().clamp(0.0, 9.0, 5.0006).unwrap();
    assert_eq!(window.end(), 5.0006);
}

#[test]
fn test_clamp_checks_before_rounding() {
    // Shorter than the minimum, even though rounding would make it look empty
    let err = WindowClamp::default().clamp(4.9996, 10.0, 5.0).unwrap_err();
    assert!(matches!(err, PlanError::WindowTooShort { .. }));

    let unlimited = WindowClamp::new(&PlanLimits {
        min_window_secs: 0.0,
        ..PlanLimits::default()
    });
    let window = unlimited.clamp(1.0001, 1.0004, 10.0).unwrap();
    assert_eq!((window.start(), window.end()), (1.0001, 1.0004));
    assert_eq!(unlimited.clamp(window.start(), window.end(), 10.0), Ok(window));

    let window = unlimited.clamp(4.9996, 10.0, 5.0).unwrap();
    assert_eq!((window.start(), window.end()), (4.9996, 5.0));
}

#[test]
fn test_clamp_output_always_within_bounds() {
    let clamp = WindowClamp::default();
    let points = [-50.0, -0.3, 0.0, 0.25, 0.5, 1.0, 4.999, 5.0, 7.5, 10.0, 10.0001, 99.0];
    for duration in [0.4, 1.0, 5.0, 10.0, 3600.0] {
        for &start in &points {
            for &end in &points {
                if let Ok(window) = clamp.clamp(start, end, duration) {
                    assert!(window.start() >= 0.0);
                    assert!(window.start() < window.end());
                    assert!(window.end() <= duration);
                    assert!(window.duration() > 0.0);
                }
            }
        }
    }
}

#[test]
fn test_default_window_caps_at_thirty_seconds() {
    let clamp = WindowClamp::default();
    let window = clamp.default_window(120.0).unwrap();
    assert_eq!((window.start(), window.end()), (0.0, DEFAULT_CLIP_SECS));

    let window = clamp.default_window(12.0).unwrap();
    assert_eq!((window.start(), window.end()), (0.0, 12.0));

    let window = clamp.open_ended(100.0, 110.0).unwrap();
    assert_eq!((window.start(), window.end()), (100.0, 110.0));
}

#[test]
fn test_crop_landscape_to_vertical() {
    let crop = AspectCropPlanner::default()
        .plan(size(1920, 1080), AspectRatio::PORTRAIT)
        .unwrap();
    assert_eq!(crop.height(), 1080);
    assert_eq!(crop.width(), 608);
    assert_eq!(crop.x(), 656);
    assert_eq!(crop.y(), 0);
}

#[test]
fn test_crop_matching_ratio_returns_full_frame() {
    let source = size(1080, 1920);
    let crop = AspectCropPlanner::default()
        .plan(source, AspectRatio::PORTRAIT)
        .unwrap();
    assert_eq!((crop.x(), crop.y(), crop.width(), crop.height()), (0, 0, 1080, 1920));
    assert!(crop.is_full_frame(source));
}

#[test]
fn test_crop_tall_source_keeps_width() {
    // 720x1600 is taller than 9:16; height becomes round(720 * 16 / 9) = 1280
    let crop = AspectCropPlanner::default()
        .plan(size(720, 1600), AspectRatio::PORTRAIT)
        .unwrap();
    assert_eq!((crop.width(), crop.height()), (720, 1280));
    assert_eq!((crop.x(), crop.y()), (0, 160));
}

#[test]
fn test_crop_extreme_ratio_is_too_small() {
    let err = AspectCropPlanner::default()
        .plan(size(1, 1000), AspectRatio::PORTRAIT)
        .unwrap_err();
    assert!(matches!(err, PlanError::CropTooSmall { minimum: 16, .. }));

    let err = AspectCropPlanner::default()
        .plan(size(5000, 10), AspectRatio::PORTRAIT)
        .unwrap_err();
    assert!(matches!(err, PlanError::CropTooSmall { .. }));
}

#[test]
fn test_crop_minimum_never_allows_zero_area() {
    let planner = AspectCropPlanner::new(&PlanLimits {
        min_crop_px: 0,
        ..PlanLimits::default()
    });
    let target = AspectRatio::new(1, 10_000).unwrap();
    match planner.plan(size(3, 1), target) {
        Ok(crop) => assert!(crop.width() > 0 && crop.height() > 0),
        Err(err) => assert!(matches!(err, PlanError::CropTooSmall { .. })),
    }
}

#[test]
fn test_crop_for_raw_dimensions() {
    let planner = AspectCropPlanner::default();
    assert_eq!(
        planner.plan_for_dimensions(0, 1080, AspectRatio::PORTRAIT),
        Err(PlanError::InvalidDimensions { width: 0, height: 1080 })
    );
    assert!(planner
        .plan_for_dimensions(1280, 720, AspectRatio::PORTRAIT)
        .is_ok());
}

#[test]
fn test_crop_contained_and_ratio_preserved() {
    let planner = AspectCropPlanner::new(&PlanLimits {
        min_crop_px: 1,
        ..PlanLimits::default()
    });
    let ratios = [
        AspectRatio::PORTRAIT,
        AspectRatio::SQUARE,
        AspectRatio::new(16, 9).unwrap(),
        AspectRatio::new(4, 5).unwrap(),
        AspectRatio::new(21, 9).unwrap(),
    ];
    let sizes = [
        (1920, 1080),
        (1080, 1920),
        (1280, 720),
        (3840, 2160),
        (640, 480),
        (1001, 999),
        (17, 1033),
        (4096, 17),
        (1, 1),
    ];
    for target in ratios {
        for (w, h) in sizes {
            let source = size(w, h);
            match planner.plan(source, target) {
                Ok(crop) => {
                    assert!(crop.fits_within(source), "{} in {}", crop, source);
                    assert!(crop.matches_ratio(target), "{} vs {}", crop, target);
                    assert!(crop.width() == source.width() || crop.height() == source.height());
                    let dx = (source.width() - crop.width()) as i64 - 2 * crop.x() as i64;
                    let dy = (source.height() - crop.height()) as i64 - 2 * crop.y() as i64;
                    assert!((0..=1).contains(&dx) && (0..=1).contains(&dy));
                }
                Err(err) => assert!(matches!(err, PlanError::CropTooSmall { .. })),
            }
        }
    }
}

#[test]
fn test_plan_for_output_adds_scale_only_when_needed() {
    let planner = AspectCropPlanner::default();
    let output = size(1080, 1920);

    let plan = planner.plan_for_output(size(1920, 1080), output).unwrap();
    assert_eq!(plan.crop.width(), 608);
    assert_eq!(plan.scale, Some(output));

    let plan = planner.plan_for_output(output, output).unwrap();
    assert!(plan.crop.is_full_frame(output));
    assert_eq!(plan.scale, None);
}

#[test]
fn test_export_planner_landscape_source() {
    let planner =
        ExportPlanner::new(&PlanLimits::default(), ExportSettings::default()).with_available_cpus(16);
    let plan = planner
        .plan(&metadata(1920, 1080, 95.4), 12.25, Some(40.9), Path::new("/out"))
        .unwrap();

    assert_eq!((plan.window.start(), plan.window.end()), (12.25, 40.9));
    assert_eq!(plan.crop.map(|c| (c.x(), c.width())), Some((656, 608)));
    assert_eq!(plan.scale, Some(size(1080, 1920)));
    assert_eq!(plan.output, PathBuf::from("/out/short_talk_12_40.mp4"));
    assert_eq!(plan.fps, 29.97);
    assert_eq!(plan.threads, 4);
    assert_eq!(plan.preset, ExportPreset::Medium);
}

#[test]
fn test_export_planner_vertical_source_skips_crop() {
    let planner =
        ExportPlanner::new(&PlanLimits::default(), ExportSettings::default()).with_available_cpus(2);
    let mut source = metadata(1080, 1920, 20.0);
    source.fps = None;
    let plan = planner.plan(&source, 0.0, None, Path::new("out")).unwrap();

    assert_eq!(plan.crop, None);
    assert_eq!(plan.scale, None);
    assert_eq!(plan.window.end(), 20.0);
    assert_eq!(plan.fps, 30.0);
    assert_eq!(plan.threads, 2);
}

#[test]
fn test_export_planner_surfaces_plan_errors() {
    let planner = ExportPlanner::new(&PlanLimits::default(), ExportSettings::default());
    let err = planner
        .plan(&metadata(1920, 1080, 10.0), 10.0, Some(20.0), Path::new("out"))
        .unwrap_err();
    assert!(matches!(err, DomainError::Plan(PlanError::EmptyWindow { .. })));

    let err = planner
        .plan(&metadata(0, 1080, 10.0), 0.0, Some(5.0), Path::new("out"))
        .unwrap_err();
    assert!(matches!(err, DomainError::Plan(PlanError::InvalidDimensions { .. })));
}

#[test]
fn test_output_file_name_requires_stem() {
    let window = WindowClamp::default().clamp(1.9, 7.2, 10.0).unwrap();
    assert_eq!(
        output_file_name(Path::new("clips/my video.mkv"), &window).unwrap(),
        PathBuf::from("short_my video_1_7.mp4")
    );
    assert!(output_file_name(Path::new("/"), &window).is_err());
}
