/// Render graph - ordered stages run for each camera of a frame.
///
/// Stages are kept sorted by `RenderPassEvent`; stages with the same event
/// run in insertion order. A failing stage is logged and the graph moves
/// on, so one stage never stalls the frame.

use crate::camera::Camera;
use crate::scene::Scene;
use crate::{engine_error, engine_trace, engine_warn};
use super::frame_resources::{FrameContext, FrameResources};
use super::render_stage::{RenderStage, StageInputs};

#[derive(Default)]
pub struct RenderGraph {
    stages: Vec<Box<dyn RenderStage>>,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stage after every stage with the same or an earlier event.
    pub fn add_stage(&mut self, stage: Box<dyn RenderStage>) {
        let event = stage.event();
        let position = self.stages.iter().position(|s| s.event() > event)
            .unwrap_or(self.stages.len());
        self.stages.insert(position, stage);
    }

    /// Remove a stage by name. Returns it, or None if not found.
    pub fn remove_stage(&mut self, name: &str) -> Option<Box<dyn RenderStage>> {
        let index = self.stages.iter().position(|s| s.name() == name)?;
        Some(self.stages.remove(index))
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Prepare and execute every stage for one camera.
    ///
    /// Returns the number of stages that completed without error.
    pub fn render_camera(
        &mut self,
        camera: &mut Camera,
        frame_index: u64,
        scene: &Scene,
        resources: &mut FrameResources,
    ) -> usize {
        let mut completed = 0;

        for stage in self.stages.iter_mut() {
            if stage.inputs().contains(StageInputs::DEPTH) && resources.depth().is_none() {
                engine_warn!("galaxy3d::RenderGraph",
                    "Stage '{}' requires depth but none was provided", stage.name());
            }

            stage.prepare(camera.descriptor());

            let mut ctx = FrameContext {
                camera: &mut *camera,
                frame_index,
                scene,
                resources: &mut *resources,
            };
            match stage.execute(&mut ctx) {
                Ok(()) => {
                    engine_trace!("galaxy3d::RenderGraph",
                        "Stage '{}' done (camera {}, frame {})", stage.name(), camera.id().0, frame_index);
                    completed += 1;
                }
                Err(e) => {
                    engine_error!("galaxy3d::RenderGraph",
                        "Stage '{}' failed: {}", stage.name(), e);
                }
            }
        }

        completed
    }
}

#[cfg(test)]
#[path = "render_graph_tests.rs"]
mod tests;
