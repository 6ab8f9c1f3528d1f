/// MotionVectorStage - orchestrates the motion vector passes for one camera
/// per frame.
///
/// ```text
/// Idle -> TargetAllocated -> HistoryUpdated -> CameraPassDone
///      -> ObjectPassDone -> Published
/// ```
///
/// `begin` allocates and clears the target and updates the camera history,
/// `render_camera_motion` and `render_object_motion` fill it in that order,
/// `end` publishes it. Calls out of order return `Error::InvalidState` and
/// leave the stage untouched. Degraded frames (preview camera, first frame,
/// frame gap, missing depth, missing culling parameters) are never errors.

use std::sync::Arc;
use glam::Mat4;
use crate::camera::{Camera, CameraId, DepthTextureMode, Viewport};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::history::{CameraTransformState, HistoryStatus, TransformHistory};
use crate::raster::MotionVectorEncoding;
use crate::render_graph::{
    FrameContext, RenderPassEvent, RenderStage, StageInputs,
    MOTION_VECTOR_TEXTURE, PREVIOUS_VIEW_PROJECTION,
};
use crate::scene::{CameraCuller, RenderQueueRange, Scene};
use crate::target::{DepthBuffer, MotionVectorTarget, RenderTextureDescriptor};
use crate::{engine_debug, engine_warn};
use super::camera_motion::CameraMotionReconstructor;
use super::object_motion::{
    DrawStats, DrawingSettings, FilteringSettings, ObjectMotionRasterizer, SortingCriteria,
    MOTION_VECTORS_PASS,
};

/// Stage progress within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Idle,
    TargetAllocated,
    HistoryUpdated,
    CameraPassDone,
    ObjectPassDone,
    Published,
}

/// Stage configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionVectorSettings {
    pub encoding: MotionVectorEncoding,
    pub enable_dynamic_batching: bool,
    pub enable_instancing: bool,
    pub sorting: SortingCriteria,
    /// Material pass drawn by the object pass
    pub shader_tag: String,
    pub render_queue_range: RenderQueueRange,
}

impl Default for MotionVectorSettings {
    fn default() -> Self {
        Self {
            encoding: MotionVectorEncoding::Uv,
            enable_dynamic_batching: true,
            enable_instancing: true,
            sorting: SortingCriteria::COMMON_OPAQUE,
            shader_tag: MOTION_VECTORS_PASS.to_string(),
            render_queue_range: RenderQueueRange::OPAQUE,
        }
    }
}

impl MotionVectorSettings {
    fn drawing_settings(&self) -> DrawingSettings {
        DrawingSettings {
            shader_tag: self.shader_tag.clone(),
            sorting: self.sorting,
            enable_dynamic_batching: self.enable_dynamic_batching,
            enable_instancing: self.enable_instancing,
            encoding: self.encoding,
        }
    }
}

/// Per-frame data captured by `begin`.
#[derive(Debug, Clone, Copy)]
struct FrameInfo {
    camera: CameraId,
    status: HistoryStatus,
    current_view_proj: Mat4,
    previous_view_proj: Mat4,
    viewport: Viewport,
}

pub struct MotionVectorStage {
    settings: MotionVectorSettings,
    history: TransformHistory,
    camera_pass: CameraMotionReconstructor,
    object_pass: ObjectMotionRasterizer,
    state: StageState,
    /// Descriptor from the last `prepare`, used instead of the camera's
    descriptor: Option<RenderTextureDescriptor>,
    target: Option<Arc<MotionVectorTarget>>,
    frame: Option<FrameInfo>,
    last_draw_stats: DrawStats,
}

impl Default for MotionVectorStage {
    fn default() -> Self {
        Self::new(MotionVectorSettings::default())
    }
}

impl MotionVectorStage {
    const SOURCE: &'static str = "galaxy3d::MotionVectorStage";

    pub fn new(settings: MotionVectorSettings) -> Self {
        Self {
            camera_pass: CameraMotionReconstructor::new(settings.encoding),
            object_pass: ObjectMotionRasterizer::default(),
            settings,
            history: TransformHistory::new(),
            state: StageState::Idle,
            descriptor: None,
            target: None,
            frame: None,
            last_draw_stats: DrawStats::default(),
        }
    }

    /// Stage using a custom culling strategy for the object pass.
    pub fn with_culler(settings: MotionVectorSettings, culler: Box<dyn CameraCuller>) -> Self {
        let mut stage = Self::new(settings);
        stage.object_pass.set_culler(culler);
        stage
    }

    pub fn settings(&self) -> &MotionVectorSettings {
        &self.settings
    }

    /// Change settings between frames.
    pub fn set_settings(&mut self, settings: MotionVectorSettings) -> Result<()> {
        self.expect_idle("set_settings")?;
        self.camera_pass.set_encoding(settings.encoding);
        self.settings = settings;
        Ok(())
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// History status of the frame being recorded (None when idle).
    pub fn history_status(&self) -> Option<HistoryStatus> {
        self.frame.map(|f| f.status)
    }

    pub fn last_draw_stats(&self) -> &DrawStats {
        &self.last_draw_stats
    }

    // ===== HISTORY =====

    pub fn camera_history(&self, camera: CameraId) -> Option<&CameraTransformState> {
        self.history.state(camera)
    }

    /// Supply a camera's history from outside (host-managed history).
    pub fn set_camera_history(&mut self, camera: CameraId, state: CameraTransformState) {
        self.history.set_state(camera, state);
    }

    /// Drop a camera's history. Returns false if the camera was unknown.
    pub fn deregister_camera(&mut self, camera: CameraId) -> bool {
        self.history.remove(camera).is_some()
    }

    pub fn tracked_camera_count(&self) -> usize {
        self.history.len()
    }

    // ===== FRAME =====

    /// Size the next targets from `descriptor` instead of the camera's own.
    pub fn prepare(&mut self, descriptor: &RenderTextureDescriptor) {
        self.descriptor = Some(*descriptor);
    }

    /// Start a frame for `camera`.
    ///
    /// Returns `Ok(false)` for preview cameras: nothing is allocated or
    /// written and the stage stays idle.
    pub fn begin(&mut self, camera: &mut Camera, frame_index: u64) -> Result<bool> {
        if !matches!(self.state, StageState::Idle | StageState::Published) {
            return Err(self.invalid_state("begin"));
        }

        if !camera.camera_type().is_interactive() {
            engine_debug!(Self::SOURCE, "Camera {} is a preview camera, skipped", camera.id().0);
            self.state = StageState::Idle;
            self.frame = None;
            return Ok(false);
        }

        let descriptor = self.descriptor.unwrap_or(*camera.descriptor());
        self.allocate_target(&descriptor);
        self.state = StageState::TargetAllocated;

        camera.request_depth_texture_mode(DepthTextureMode::DEPTH | DepthTextureMode::MOTION_VECTORS);

        let status = self.history.update(camera.id(), frame_index, camera.view_projection_matrix());
        let (current_view_proj, previous_view_proj) = match self.history.state(camera.id()) {
            Some(state) => (*state.current_view_proj(), *state.previous_view_proj()),
            None => {
                let vp = camera.view_projection_matrix();
                (vp, vp)
            }
        };
        if !status.has_valid_delta() {
            engine_debug!(Self::SOURCE, "Camera {} frame {}: {:?}, camera motion disabled",
                camera.id().0, frame_index, status);
        }

        self.frame = Some(FrameInfo {
            camera: camera.id(),
            status,
            current_view_proj,
            previous_view_proj,
            viewport: *camera.viewport(),
        });
        self.state = StageState::HistoryUpdated;
        Ok(true)
    }

    /// Camera-only motion from depth. Skipped (with a warning) when no depth
    /// buffer is available, and skipped by policy without a valid history delta.
    pub fn render_camera_motion(&mut self, depth: Option<&DepthBuffer>) -> Result<bool> {
        if self.state != StageState::HistoryUpdated {
            return Err(self.invalid_state("render_camera_motion"));
        }
        let Some(frame) = self.frame else {
            return Err(self.invalid_state("render_camera_motion"));
        };
        let Some(target) = self.target.as_mut().and_then(Arc::get_mut) else {
            return Err(self.invalid_state("render_camera_motion"));
        };

        let ran = match depth {
            Some(depth) => self.camera_pass.reconstruct(
                depth,
                &frame.current_view_proj,
                &frame.previous_view_proj,
                frame.status,
                &frame.viewport,
                target,
            ),
            None => {
                if frame.status.has_valid_delta() {
                    engine_warn!(Self::SOURCE, "No depth buffer, camera pass skipped");
                }
                false
            }
        };

        self.state = StageState::CameraPassDone;
        Ok(ran)
    }

    /// Per-object motion, drawn over the camera motion.
    pub fn render_object_motion(&mut self, camera: &Camera, scene: &Scene) -> Result<DrawStats> {
        if self.state != StageState::CameraPassDone {
            return Err(self.invalid_state("render_object_motion"));
        }
        let Some(frame) = self.frame else {
            return Err(self.invalid_state("render_object_motion"));
        };
        if frame.camera != camera.id() {
            return Err(Engine::log_and_return_error(Self::SOURCE, Error::InvalidState(format!(
                "render_object_motion() called with camera {} during frame of camera {}",
                camera.id().0, frame.camera.0,
            ))));
        }
        let Some(target) = self.target.as_mut().and_then(Arc::get_mut) else {
            return Err(self.invalid_state("render_object_motion"));
        };

        let culling = camera.try_culling_parameters();
        let filtering = FilteringSettings {
            render_queue_range: self.settings.render_queue_range,
            ..FilteringSettings::default()
        };
        let stats = self.object_pass.draw(
            scene,
            culling.as_ref(),
            &frame.previous_view_proj,
            &frame.viewport,
            &self.settings.drawing_settings(),
            &filtering,
            target,
        );

        self.last_draw_stats = stats;
        self.state = StageState::ObjectPassDone;
        Ok(stats)
    }

    /// Publish the finished target. No writes happen until the next `begin`.
    pub fn end(&mut self) -> Result<Arc<MotionVectorTarget>> {
        if self.state != StageState::ObjectPassDone {
            return Err(self.invalid_state("end"));
        }
        let Some(target) = self.target.clone() else {
            return Err(self.invalid_state("end"));
        };
        self.state = StageState::Published;
        Ok(target)
    }

    /// Target of the last published frame.
    pub fn published(&self) -> Option<&Arc<MotionVectorTarget>> {
        match self.state {
            StageState::Published => self.target.as_ref(),
            _ => None,
        }
    }

    /// Previous view-projection of the frame being recorded or just published.
    pub fn previous_view_projection(&self) -> Option<Mat4> {
        self.frame.map(|f| f.previous_view_proj)
    }

    /// Abandon the frame in progress and return to `Idle`.
    ///
    /// History already updated by `begin` is kept.
    pub fn reset(&mut self) {
        self.state = StageState::Idle;
        self.frame = None;
    }

    /// Reuse the previous buffer when no consumer still holds it.
    fn allocate_target(&mut self, descriptor: &RenderTextureDescriptor) {
        if let Some(target) = self.target.as_mut().and_then(Arc::get_mut) {
            target.reset(descriptor);
            return;
        }
        self.target = Some(Arc::new(MotionVectorTarget::new(descriptor)));
    }

    fn expect_idle(&self, operation: &str) -> Result<()> {
        match self.state {
            StageState::Idle | StageState::Published => Ok(()),
            _ => Err(self.invalid_state(operation)),
        }
    }

    fn invalid_state(&self, operation: &str) -> Error {
        Engine::log_and_return_error(
            Self::SOURCE,
            Error::InvalidState(format!("{}() called in state {:?}", operation, self.state)),
        )
    }
}

// ===== RENDER GRAPH INTEGRATION =====

impl RenderStage for MotionVectorStage {
    fn name(&self) -> &str {
        "MotionVectors"
    }

    fn event(&self) -> RenderPassEvent {
        RenderPassEvent::BeforeRenderingPostProcessing
    }

    fn inputs(&self) -> StageInputs {
        StageInputs::DEPTH
    }

    fn prepare(&mut self, descriptor: &RenderTextureDescriptor) {
        MotionVectorStage::prepare(self, descriptor);
    }

    fn execute(&mut self, ctx: &mut FrameContext) -> Result<()> {
        if !self.begin(ctx.camera, ctx.frame_index)? {
            return Ok(());
        }

        let result = self.render_camera_motion(ctx.resources.depth().map(|d| d.as_ref()))
            .and_then(|_| self.render_object_motion(ctx.camera, ctx.scene))
            .and_then(|_| self.end());

        match result {
            Ok(target) => {
                ctx.resources.set_texture(MOTION_VECTOR_TEXTURE, target);
                if let Some(previous) = self.previous_view_projection() {
                    ctx.resources.set_matrix(PREVIOUS_VIEW_PROJECTION, previous);
                }
                Ok(())
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "motion_vector_stage_tests.rs"]
mod tests;
