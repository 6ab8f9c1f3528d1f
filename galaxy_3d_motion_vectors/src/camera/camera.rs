/// Camera - host-owned description of one rendering viewpoint.
///
/// The camera computes nothing beyond derived matrices. The host sets
/// the view and projection each frame; the motion vector stage reads them
/// and requests the depth and motion vector capabilities it needs.

use bitflags::bitflags;
use glam::{Mat4, Vec3};
use crate::target::RenderTextureDescriptor;
use super::frustum::Frustum;
use super::viewport::Viewport;

/// Culling mask that accepts every layer.
pub const ALL_LAYERS: u32 = u32::MAX;

/// Stable identity of a camera across frames.
///
/// Chosen by the host. Transform history is keyed by this value, so two
/// cameras must never share an id while both are alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub u64);

/// What a camera renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraType {
    /// In-game camera
    Game,
    /// Editor scene view
    SceneView,
    /// Reflection probe / planar reflection camera
    Reflection,
    /// Asset preview thumbnail camera (never gets motion vectors)
    Preview,
}

impl CameraType {
    /// Whether this camera type takes part in temporal effects.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, CameraType::Preview)
    }
}

bitflags! {
    /// Extra buffers the host must produce for a camera.
    ///
    /// The stage sets `DEPTH | MOTION_VECTORS` on every camera it processes,
    /// which tells the host to keep previous world matrices for the next frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DepthTextureMode: u32 {
        const DEPTH          = 1 << 0;
        const MOTION_VECTORS = 1 << 1;
    }
}

/// Everything the object pass needs to cull against a camera.
#[derive(Debug, Clone, Copy)]
pub struct CullingParameters {
    pub view_matrix: Mat4,
    pub view_projection: Mat4,
    pub frustum: Frustum,
    pub culling_mask: u32,
    pub camera_position: Vec3,
}

/// Host camera.
#[derive(Debug, Clone)]
pub struct Camera {
    id: CameraId,
    camera_type: CameraType,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    viewport: Viewport,
    culling_mask: u32,
    descriptor: RenderTextureDescriptor,
    depth_texture_mode: DepthTextureMode,
}

impl Camera {
    /// Create a camera rendering into a target described by `descriptor`.
    ///
    /// The viewport covers the whole target and every layer is visible.
    pub fn new(
        id: CameraId,
        camera_type: CameraType,
        view: Mat4,
        projection: Mat4,
        descriptor: RenderTextureDescriptor,
    ) -> Self {
        Self {
            id,
            camera_type,
            view_matrix: view,
            projection_matrix: projection,
            viewport: Viewport::full(descriptor.width, descriptor.height),
            culling_mask: ALL_LAYERS,
            descriptor,
            depth_texture_mode: DepthTextureMode::empty(),
        }
    }

    // ===== GETTERS =====

    pub fn id(&self) -> CameraId {
        self.id
    }

    pub fn camera_type(&self) -> CameraType {
        self.camera_type
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// World-space camera position (translation of the inverse view).
    pub fn position(&self) -> Vec3 {
        self.view_matrix.inverse().w_axis.truncate()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Bit mask of visible layers (bit `n` = layer `n`).
    pub fn culling_mask(&self) -> u32 {
        self.culling_mask
    }

    /// Render resolution of this camera.
    pub fn descriptor(&self) -> &RenderTextureDescriptor {
        &self.descriptor
    }

    pub fn depth_texture_mode(&self) -> DepthTextureMode {
        self.depth_texture_mode
    }

    /// Derive culling parameters, or `None` if the camera is not render-ready.
    ///
    /// A camera is not render-ready when its target or viewport is empty, or
    /// its view-projection matrix is not finite or not invertible.
    pub fn try_culling_parameters(&self) -> Option<CullingParameters> {
        if self.descriptor.is_empty() || self.viewport.is_empty() {
            return None;
        }

        let view_projection = self.view_projection_matrix();
        if !view_projection.is_finite() || view_projection.determinant().abs() <= f32::EPSILON * f32::EPSILON {
            return None;
        }

        Some(CullingParameters {
            view_matrix: self.view_matrix,
            view_projection,
            frustum: Frustum::from_view_projection(&view_projection),
            culling_mask: self.culling_mask,
            camera_position: self.position(),
        })
    }

    // ===== SETTERS =====

    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_culling_mask(&mut self, mask: u32) {
        self.culling_mask = mask;
    }

    pub fn set_camera_type(&mut self, camera_type: CameraType) {
        self.camera_type = camera_type;
    }

    /// Change the render resolution. The viewport is reset to the full target.
    pub fn set_descriptor(&mut self, descriptor: RenderTextureDescriptor) {
        self.viewport = Viewport::full(descriptor.width, descriptor.height);
        self.descriptor = descriptor;
    }

    /// Add capability flags (existing flags are kept).
    pub fn request_depth_texture_mode(&mut self, mode: DepthTextureMode) {
        self.depth_texture_mode |= mode;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
