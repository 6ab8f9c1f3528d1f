/// Tests for TransformHistory
///
/// First frame, consecutive frames, frame gaps, repeated frame indices,
/// external state and deregistration.

use glam::{Mat4, Vec3};
use crate::camera::CameraId;
use super::*;

const CAM: CameraId = CameraId(1);

fn vp(x: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, 0.0, 0.0))
}

// ============================================================================
// First frame
// ============================================================================

#[test]
fn test_first_update_reports_first_frame() {
    let mut history = TransformHistory::new();

    assert_eq!(history.update(CAM, 10, vp(1.0)), HistoryStatus::FirstFrame);

    let state = history.state(CAM).unwrap();
    assert!(state.is_first_frame());
    assert_eq!(state.last_active_frame(), 10);
    assert_eq!(*state.current_view_proj(), vp(1.0));
    assert_eq!(*state.previous_view_proj(), vp(1.0));
}

// ============================================================================
// Consecutive frames
// ============================================================================

#[test]
fn test_consecutive_update_swaps_then_overwrites() {
    let mut history = TransformHistory::new();
    history.update(CAM, 10, vp(1.0));

    assert_eq!(history.update(CAM, 11, vp(2.0)), HistoryStatus::Normal);

    let state = history.state(CAM).unwrap();
    assert!(!state.is_first_frame());
    assert_eq!(*state.previous_view_proj(), vp(1.0));
    assert_eq!(*state.current_view_proj(), vp(2.0));
    assert_eq!(state.last_active_frame(), 11);

    assert_eq!(history.update(CAM, 12, vp(3.0)), HistoryStatus::Normal);
    assert_eq!(*history.state(CAM).unwrap().previous_view_proj(), vp(2.0));
}

// ============================================================================
// Frame gaps
// ============================================================================

#[test]
fn test_gap_resets_previous_to_current() {
    let mut history = TransformHistory::new();
    history.update(CAM, 10, vp(1.0));

    assert_eq!(history.update(CAM, 15, vp(9.0)), HistoryStatus::FrameGap);

    let state = history.state(CAM).unwrap();
    assert_eq!(*state.previous_view_proj(), vp(9.0));
    assert_eq!(*state.current_view_proj(), vp(9.0));
    assert_eq!(state.last_active_frame(), 15);
    assert!(!HistoryStatus::FrameGap.has_valid_delta());
}

#[test]
fn test_frame_after_gap_is_normal_again() {
    let mut history = TransformHistory::new();
    history.update(CAM, 10, vp(1.0));
    history.update(CAM, 15, vp(9.0));

    assert_eq!(history.update(CAM, 16, vp(10.0)), HistoryStatus::Normal);
    assert_eq!(*history.state(CAM).unwrap().previous_view_proj(), vp(9.0));
}

#[test]
fn test_backwards_frame_index_is_a_gap() {
    let mut history = TransformHistory::new();
    history.update(CAM, 10, vp(1.0));

    assert_eq!(history.update(CAM, 3, vp(2.0)), HistoryStatus::FrameGap);
    assert_eq!(*history.state(CAM).unwrap().previous_view_proj(), vp(2.0));
}

// ============================================================================
// Repeated frame index
// ============================================================================

#[test]
fn test_same_frame_twice_does_not_mutate() {
    let mut history = TransformHistory::new();
    history.update(CAM, 10, vp(1.0));
    history.update(CAM, 11, vp(2.0));
    let before = *history.state(CAM).unwrap();

    assert_eq!(history.update(CAM, 11, vp(2.0)), HistoryStatus::Normal);
    assert_eq!(*history.state(CAM).unwrap(), before);
}

#[test]
fn test_same_frame_twice_on_first_frame_stays_first_frame() {
    let mut history = TransformHistory::new();
    history.update(CAM, 4, vp(1.0));

    assert_eq!(history.update(CAM, 4, vp(1.0)), HistoryStatus::FirstFrame);
    assert!(history.state(CAM).unwrap().is_first_frame());
}

// ============================================================================
// Multiple cameras, external state, deregistration
// ============================================================================

#[test]
fn test_cameras_are_independent() {
    let mut history = TransformHistory::new();
    history.update(CameraId(1), 0, vp(1.0));
    history.update(CameraId(2), 0, vp(5.0));

    assert_eq!(history.update(CameraId(1), 1, vp(2.0)), HistoryStatus::Normal);
    assert_eq!(*history.state(CameraId(2)).unwrap().current_view_proj(), vp(5.0));
    assert_eq!(history.len(), 2);
}

#[test]
fn test_external_state_is_used_for_next_frame() {
    let mut history = TransformHistory::new();
    history.set_state(CAM, CameraTransformState::new(20, vp(4.0), vp(3.0)));

    assert_eq!(history.update(CAM, 21, vp(5.0)), HistoryStatus::Normal);
    assert_eq!(*history.state(CAM).unwrap().previous_view_proj(), vp(4.0));
}

#[test]
fn test_remove_forgets_camera() {
    let mut history = TransformHistory::new();
    history.update(CAM, 0, vp(1.0));

    assert!(history.remove(CAM).is_some());
    assert!(!history.contains(CAM));
    assert!(history.remove(CAM).is_none());

    // Re-registration starts over
    assert_eq!(history.update(CAM, 1, vp(1.0)), HistoryStatus::FirstFrame);
}

#[test]
fn test_clear() {
    let mut history = TransformHistory::new();
    history.update(CameraId(1), 0, vp(1.0));
    history.update(CameraId(2), 0, vp(1.0));

    history.clear();

    assert!(history.is_empty());
}
