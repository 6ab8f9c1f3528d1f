/// TransformHistory - per-camera double-buffered view-projection matrices.
///
/// One `CameraTransformState` per camera identity. A state is created the
/// first time a camera is seen, mutated at most once per frame index, and
/// removed only when the host deregisters the camera.

use glam::Mat4;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use crate::camera::CameraId;

/// Outcome of a history update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    /// Camera seen for the first time: previous == current, no valid delta.
    FirstFrame,
    /// Camera skipped one or more frames: previous reset to current.
    FrameGap,
    /// Consecutive frame: previous holds last frame's matrix.
    Normal,
}

impl HistoryStatus {
    /// Whether previous/current form a usable delta for camera reconstruction.
    pub fn has_valid_delta(&self) -> bool {
        matches!(self, HistoryStatus::Normal)
    }
}

/// History record of one camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransformState {
    is_first_frame: bool,
    last_active_frame: u64,
    current_view_proj: Mat4,
    previous_view_proj: Mat4,
    last_status: HistoryStatus,
}

impl CameraTransformState {
    /// Externally managed history: `previous` was active at
    /// `last_active_frame - 1` and `current` at `last_active_frame`.
    pub fn new(last_active_frame: u64, current_view_proj: Mat4, previous_view_proj: Mat4) -> Self {
        Self {
            is_first_frame: false,
            last_active_frame,
            current_view_proj,
            previous_view_proj,
            last_status: HistoryStatus::Normal,
        }
    }

    fn first(frame_index: u64, view_proj: Mat4) -> Self {
        Self {
            is_first_frame: true,
            last_active_frame: frame_index,
            current_view_proj: view_proj,
            previous_view_proj: view_proj,
            last_status: HistoryStatus::FirstFrame,
        }
    }

    pub fn is_first_frame(&self) -> bool {
        self.is_first_frame
    }

    pub fn last_active_frame(&self) -> u64 {
        self.last_active_frame
    }

    pub fn current_view_proj(&self) -> &Mat4 {
        &self.current_view_proj
    }

    pub fn previous_view_proj(&self) -> &Mat4 {
        &self.previous_view_proj
    }

    /// Status returned by the most recent update.
    pub fn last_status(&self) -> HistoryStatus {
        self.last_status
    }

    fn advance(&mut self, frame_index: u64, view_proj: Mat4) -> HistoryStatus {
        // Same frame again: history was already swapped for this frame
        if frame_index == self.last_active_frame {
            return self.last_status;
        }

        let consecutive = self.last_active_frame.checked_add(1) == Some(frame_index);
        let status = if consecutive {
            self.previous_view_proj = self.current_view_proj;
            HistoryStatus::Normal
        } else {
            // Gap, or the host's frame counter went backwards
            self.previous_view_proj = view_proj;
            HistoryStatus::FrameGap
        };

        self.current_view_proj = view_proj;
        self.last_active_frame = frame_index;
        self.is_first_frame = false;
        self.last_status = status;
        status
    }
}

/// Map from camera identity to its transform history.
#[derive(Debug, Default)]
pub struct TransformHistory {
    states: FxHashMap<CameraId, CameraTransformState>,
}

impl TransformHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `view_proj` as the camera's matrix for `frame_index`.
    ///
    /// Never fails: unseen cameras report `FirstFrame`, skipped frames report
    /// `FrameGap`, and both leave previous == current (zero camera motion).
    /// Calling twice with the same frame index returns the first call's status
    /// and leaves the state untouched.
    pub fn update(&mut self, camera: CameraId, frame_index: u64, view_proj: Mat4) -> HistoryStatus {
        match self.states.entry(camera) {
            Entry::Vacant(entry) => {
                entry.insert(CameraTransformState::first(frame_index, view_proj));
                crate::engine_info!("galaxy3d::TransformHistory",
                    "Camera {} registered at frame {}", camera.0, frame_index);
                HistoryStatus::FirstFrame
            }
            Entry::Occupied(mut entry) => {
                let last = entry.get().last_active_frame;
                let status = entry.get_mut().advance(frame_index, view_proj);
                if status == HistoryStatus::FrameGap && frame_index != last {
                    crate::engine_debug!("galaxy3d::TransformHistory",
                        "Camera {} inactive between frames {} and {}, history reset",
                        camera.0, last, frame_index);
                }
                status
            }
        }
    }

    /// History of a camera, if it has been seen.
    pub fn state(&self, camera: CameraId) -> Option<&CameraTransformState> {
        self.states.get(&camera)
    }

    /// Replace a camera's history with externally managed data.
    pub fn set_state(&mut self, camera: CameraId, state: CameraTransformState) {
        self.states.insert(camera, state);
    }

    /// Forget a camera (deregistration). Returns its last state.
    pub fn remove(&mut self, camera: CameraId) -> Option<CameraTransformState> {
        let removed = self.states.remove(&camera);
        if removed.is_some() {
            crate::engine_info!("galaxy3d::TransformHistory", "Camera {} deregistered", camera.0);
        }
        removed
    }

    pub fn contains(&self, camera: CameraId) -> bool {
        self.states.contains_key(&camera)
    }

    /// Number of tracked cameras
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Forget every camera
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
#[path = "transform_history_tests.rs"]
mod tests;
