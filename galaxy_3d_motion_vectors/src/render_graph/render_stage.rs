/// Render stage trait and scheduling metadata.
///
/// A RenderStage is one step of a camera's frame. The graph calls
/// `prepare` with the camera's render descriptor, then `execute` with the
/// frame context, in `RenderPassEvent` order.

use bitflags::bitflags;
use crate::error::Result;
use crate::target::RenderTextureDescriptor;
use super::frame_resources::FrameContext;

/// Point of the frame at which a stage runs (declaration order is run order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderPassEvent {
    BeforeRendering,
    BeforeRenderingPrePasses,
    AfterRenderingPrePasses,
    BeforeRenderingOpaques,
    AfterRenderingOpaques,
    BeforeRenderingTransparents,
    AfterRenderingTransparents,
    BeforeRenderingPostProcessing,
    AfterRenderingPostProcessing,
    AfterRendering,
}

bitflags! {
    /// Frame inputs a stage needs before it executes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StageInputs: u32 {
        const DEPTH  = 1 << 0;
        const NORMAL = 1 << 1;
        const COLOR  = 1 << 2;
    }
}

/// Step of a camera's frame, scheduled by a RenderGraph.
pub trait RenderStage: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn event(&self) -> RenderPassEvent;

    /// Inputs the host must provide before `execute`.
    fn inputs(&self) -> StageInputs {
        StageInputs::empty()
    }

    /// Called before `execute` with the camera's render descriptor.
    fn prepare(&mut self, _descriptor: &RenderTextureDescriptor) {}

    /// Record the stage for the current camera.
    fn execute(&mut self, ctx: &mut FrameContext) -> Result<()>;
}
