//! Camera transform history
//!
//! Double-buffered view-projection matrices per camera, with first-frame and
//! frame-gap detection.

mod transform_history;

pub use transform_history::{TransformHistory, CameraTransformState, HistoryStatus};
