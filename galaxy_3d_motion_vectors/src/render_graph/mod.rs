//! Render graph module
//!
//! Minimal host scheduler: stages declare when they run and which inputs
//! they need, and the graph prepares and executes them per camera per frame.

mod render_stage;
mod frame_resources;
mod render_graph;

pub use render_stage::{RenderStage, RenderPassEvent, StageInputs};
pub use frame_resources::{
    FrameContext, FrameResources, MOTION_VECTOR_TEXTURE, PREVIOUS_VIEW_PROJECTION,
};
pub use render_graph::RenderGraph;
