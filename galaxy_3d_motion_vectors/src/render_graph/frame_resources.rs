/// Frame resources - named data shared between stages of one camera frame.

use std::sync::Arc;
use glam::Mat4;
use rustc_hash::FxHashMap;
use crate::camera::Camera;
use crate::scene::Scene;
use crate::target::{DepthBuffer, MotionVectorTarget};

/// Global name of the published motion vector texture.
pub const MOTION_VECTOR_TEXTURE: &str = "_MotionVectorTexture";

/// Global name of the previous frame's view-projection matrix.
pub const PREVIOUS_VIEW_PROJECTION: &str = "_PrevViewProjMatrix";

/// Resources produced and consumed during a camera's frame.
#[derive(Debug, Default, Clone)]
pub struct FrameResources {
    depth: Option<Arc<DepthBuffer>>,
    textures: FxHashMap<String, Arc<MotionVectorTarget>>,
    matrices: FxHashMap<String, Mat4>,
}

impl FrameResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth prepass result for the current camera.
    pub fn depth(&self) -> Option<&Arc<DepthBuffer>> {
        self.depth.as_ref()
    }

    pub fn set_depth(&mut self, depth: Arc<DepthBuffer>) {
        self.depth = Some(depth);
    }

    pub fn clear_depth(&mut self) {
        self.depth = None;
    }

    pub fn texture(&self, name: &str) -> Option<&Arc<MotionVectorTarget>> {
        self.textures.get(name)
    }

    pub fn set_texture(&mut self, name: &str, texture: Arc<MotionVectorTarget>) {
        self.textures.insert(name.to_string(), texture);
    }

    pub fn remove_texture(&mut self, name: &str) -> Option<Arc<MotionVectorTarget>> {
        self.textures.remove(name)
    }

    pub fn matrix(&self, name: &str) -> Option<Mat4> {
        self.matrices.get(name).copied()
    }

    pub fn set_matrix(&mut self, name: &str, matrix: Mat4) {
        self.matrices.insert(name.to_string(), matrix);
    }

    /// Drop everything (start of a new camera frame)
    pub fn clear(&mut self) {
        self.depth = None;
        self.textures.clear();
        self.matrices.clear();
    }
}

/// Everything a stage sees while executing.
pub struct FrameContext<'a> {
    pub camera: &'a mut Camera,
    pub frame_index: u64,
    pub scene: &'a Scene,
    pub resources: &'a mut FrameResources,
}
