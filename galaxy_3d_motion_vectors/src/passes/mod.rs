//! Passes module
//!
//! The two passes that fill a motion vector target and the stage that
//! orchestrates them per camera per frame.

mod camera_motion;
mod object_motion;
mod motion_vector_stage;

pub use camera_motion::CameraMotionReconstructor;
pub use object_motion::{
    ObjectMotionRasterizer, DrawingSettings, FilteringSettings, SortingCriteria,
    DrawStats, MOTION_VECTORS_PASS,
};
pub use motion_vector_stage::{MotionVectorStage, MotionVectorSettings, StageState};
