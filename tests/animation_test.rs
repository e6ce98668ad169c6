// tests/animation_test.rs

mod common;

use approx::assert_abs_diff_eq;
use bridge_beam_render::{
    normalize_for_bars, read_log, select_frames, BridgeError, ErrorKind, FrameAnimator,
    PanelLayout,
};
use common::{single_segment_log, temp_path};
use ndarray::arr2;

const EPS: f64 = 1e-9;

#[test]
fn test_log_to_frames_hand_off() {
    let columns = [
        vec![0.0, 45.0],
        vec![90.0, 45.0],
        vec![180.0, 45.0],
        vec![270.0, 45.0],
    ];
    let path = single_segment_log("AMR", &columns).write_temp("hand_off.tdms");
    let table = read_log(&path, "AMR").unwrap();
    let matrix = table.to_angle_matrix();
    assert_eq!(matrix.dim(), (2, 4));
    assert_eq!(matrix.row(0).to_vec(), vec![0.0, 90.0, 180.0, 270.0]);

    let animator = FrameAnimator::with_defaults(10.0, matrix).unwrap();
    assert_eq!(animator.frame_count(), 2);

    let first = animator.frame_state(0).unwrap();
    let expected_ends = [(10.0, 0.0), (0.0, 10.0), (-10.0, 0.0), (0.0, -10.0)];
    for (segment, (x, y)) in first.segments.iter().zip(expected_ends) {
        assert_eq!(segment.points()[0], (0.0, 0.0));
        assert_abs_diff_eq!(segment.end.x, x, epsilon = EPS);
        assert_abs_diff_eq!(segment.end.y, y, epsilon = EPS);
    }

    let second = animator.frame_state(1).unwrap();
    let diagonal = 10.0 / 2f64.sqrt();
    for segment in second.segments.iter() {
        assert_abs_diff_eq!(segment.end.x, diagonal, epsilon = EPS);
        assert_abs_diff_eq!(segment.end.y, diagonal, epsilon = EPS);
        assert_abs_diff_eq!(segment.length(), 10.0, epsilon = EPS);
    }
    std::fs::remove_file(path).ok();
}

#[test]
fn test_frame_index_bounds() {
    let animator =
        FrameAnimator::with_defaults(10.0, arr2(&[[0.0, 90.0, 180.0, 270.0], [45.0, 45.0, 45.0, 45.0]]))
            .unwrap();
    for index in 0..animator.frame_count() {
        assert_eq!(animator.frame_state(index).unwrap().segments.len(), 4);
    }
    let err = animator.frame_state(2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    assert_eq!(err.to_string(), "Frame index 2 out of range for 2 frames");
}

#[test]
fn test_rotation_about_custom_origin() {
    let animator = FrameAnimator::new(
        4.0,
        arr2(&[[90.0, 180.0, 0.0, -90.0]]),
        (2.0, 3.0),
        PanelLayout::Geometry,
    )
    .unwrap();
    let state = animator.frame_state(0).unwrap();
    let expected_ends = [(2.0, 7.0), (-2.0, 3.0), (6.0, 3.0), (2.0, -1.0)];
    for (segment, (x, y)) in state.segments.iter().zip(expected_ends) {
        assert_abs_diff_eq!(segment.start.x, 2.0, epsilon = EPS);
        assert_abs_diff_eq!(segment.start.y, 3.0, epsilon = EPS);
        assert_abs_diff_eq!(segment.end.x, x, epsilon = EPS);
        assert_abs_diff_eq!(segment.end.y, y, epsilon = EPS);
    }
}

#[test]
fn test_bar_normalization_scenario() {
    let row = arr2(&[[-10.0, 0.0, 10.0, 20.0]]);
    let normalized = normalize_for_bars(row.row(0)).unwrap();
    for (value, wanted) in normalized.iter().zip([0.01, 10.01, 20.01, 30.01]) {
        assert_abs_diff_eq!(*value, wanted, epsilon = 1e-12);
    }

    let animator = FrameAnimator::new(10.0, row, (0.0, 0.0), PanelLayout::GeometryWithBars).unwrap();
    let heights = animator.frame_state(0).unwrap().bar_heights.unwrap();
    assert_abs_diff_eq!(heights[0], 0.01, epsilon = 1e-12);
    assert!(heights.iter().all(|&h| h > 0.0));
}

#[test]
fn test_shape_mismatch_from_three_column_matrix() {
    let err = FrameAnimator::with_defaults(10.0, arr2(&[[1.0, 2.0, 3.0]])).unwrap_err();
    assert!(matches!(err, BridgeError::ShapeMismatch(_)));
}

#[test]
fn test_animate_rejects_bad_frames_before_writing() {
    let animator =
        FrameAnimator::with_defaults(10.0, arr2(&[[0.0, 0.0, 0.0, 0.0]])).unwrap();
    let output = temp_path("never_written.gif");
    let err = animator.animate(&output, 300, Some(vec![0, 1])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    assert!(!output.exists());
}

#[test]
fn test_render_png_rejects_out_of_range_frame() {
    let animator =
        FrameAnimator::with_defaults(10.0, arr2(&[[0.0, 0.0, 0.0, 0.0]])).unwrap();
    let output = temp_path("never_written.png");
    let err = animator.render_png(&output, 3).unwrap_err();
    assert!(matches!(err, BridgeError::IndexOutOfRange { index: 3, len: 1 }));
    assert!(!output.exists());
}

#[test]
fn test_animate_writes_gif() {
    let angles = arr2(&[[0.0, 90.0, 180.0, 270.0], [45.0, 45.0, 45.0, 45.0]]);
    let animator = FrameAnimator::with_defaults(10.0, angles).unwrap();
    let output = temp_path("scenario.gif");

    let animation = animator.animate(&output, 300, None).unwrap();
    assert_eq!(animation.frame_count(), 2);
    assert_eq!(animation.interval_ms(), 300);
    assert_eq!(animation.path(), output.as_path());
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
    std::fs::remove_file(&output).unwrap();
}

#[test]
fn test_render_png_writes_frame() {
    let angles = arr2(&[[0.0, 90.0, 180.0, 270.0], [45.0, 45.0, 45.0, 45.0]]);
    let animator = FrameAnimator::new(10.0, angles, (0.0, 0.0), PanelLayout::GeometryWithBars)
        .unwrap();
    let output = temp_path("frame1.png");

    let state = animator.render_png(&output, 1).unwrap();
    assert_eq!(state.index, 1);
    assert!(state.bar_heights.is_some());
    assert!(std::fs::metadata(&output).unwrap().len() > 0);
    std::fs::remove_file(&output).unwrap();
}

#[test]
fn test_frame_selection_feeds_playback() {
    let angles = arr2(&[
        [0.0, 0.0, 0.0, 0.0],
        [1.0, 1.0, 1.0, 1.0],
        [2.0, 2.0, 2.0, 2.0],
        [3.0, 3.0, 3.0, 3.0],
    ]);
    let animator = FrameAnimator::with_defaults(10.0, angles).unwrap();
    let frames = select_frames(1, None, 2, animator.frame_count()).unwrap();
    let playback = animator.playback(Some(frames)).unwrap();
    assert_eq!(playback.frames(), &[1, 3]);
    assert_eq!(playback.remaining(), 2);
}
