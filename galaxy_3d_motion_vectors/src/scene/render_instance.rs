/// Render instance types for the scene system.
///
/// A RenderInstance is one drawable surface: a mesh, a material, and the
/// world matrix of the current and previous frame. Skinned or otherwise
/// deformed surfaces also carry current and previous vertex positions.

use glam::{Vec3, Mat4};
use slotmap::new_key_type;
use super::mesh::Mesh;
use super::material::Material;

// ===== SLOT MAP KEYS =====

new_key_type! {
    /// Stable key for a RenderInstance within a Scene.
    pub struct RenderInstanceKey;

    /// Stable key for a Mesh within a Scene.
    pub struct MeshKey;

    /// Stable key for a Material within a Scene.
    pub struct MaterialKey;
}

// ===== AABB =====

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Smallest box containing all points, or None for an empty set.
    pub fn from_points<'a, I: IntoIterator<Item = &'a Vec3>>(points: I) -> Option<AABB> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(AABB { min, max })
    }

    /// Transform this local-space AABB by a matrix, returning a new AABB.
    ///
    /// Arvo method: projects each matrix axis onto the extents for an exact
    /// result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Test if this AABB intersects (overlaps or touches) another AABB.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

// ===== MOTION VECTOR MODE =====

/// How a surface contributes to the motion vector buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionVectorGenerationMode {
    /// Only camera motion (skipped by the object pass).
    Camera,
    /// Per-object motion from current and previous transforms.
    #[default]
    Object,
    /// Drawn by the object pass with zero motion.
    ForceNoMotion,
}

// ===== DEFORMATION =====

/// Per-vertex positions of a deformed surface (object space).
///
/// Both arrays have one entry per mesh vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Deformation {
    pub current: Vec<Vec3>,
    pub previous: Vec<Vec3>,
}

// ===== RENDER INSTANCE =====

/// A drawable surface in the scene.
#[derive(Debug, Clone)]
pub struct RenderInstance {
    mesh: MeshKey,
    material: MaterialKey,
    world_matrix: Mat4,
    previous_world_matrix: Mat4,
    layer: u8,
    visible: bool,
    motion_vector_mode: MotionVectorGenerationMode,
    deformation: Option<Deformation>,
}

impl RenderInstance {
    /// New instance; previous world matrix starts equal to the current one.
    pub(crate) fn new(mesh: MeshKey, material: MaterialKey, world_matrix: Mat4) -> Self {
        Self {
            mesh,
            material,
            world_matrix,
            previous_world_matrix: world_matrix,
            layer: 0,
            visible: true,
            motion_vector_mode: MotionVectorGenerationMode::default(),
            deformation: None,
        }
    }

    pub fn mesh(&self) -> MeshKey {
        self.mesh
    }

    pub fn material(&self) -> MaterialKey {
        self.material
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    pub fn previous_world_matrix(&self) -> &Mat4 {
        &self.previous_world_matrix
    }

    /// Layer index (0..32), tested against the camera culling mask.
    pub fn layer(&self) -> u8 {
        self.layer
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn motion_vector_mode(&self) -> MotionVectorGenerationMode {
        self.motion_vector_mode
    }

    pub fn deformation(&self) -> Option<&Deformation> {
        self.deformation.as_ref()
    }

    /// True if the transform or the vertices changed since the previous frame.
    pub fn has_moved(&self) -> bool {
        self.world_matrix != self.previous_world_matrix
            || self.deformation.as_ref().is_some_and(|d| d.current != d.previous)
    }

    /// True if the instance is on a layer included in `culling_mask`.
    pub fn is_in_layer_mask(&self, culling_mask: u32) -> bool {
        culling_mask & (1u32 << self.layer) != 0
    }

    // ===== crate-internal mutation (through Scene) =====

    pub(crate) fn set_world_matrix(&mut self, matrix: Mat4) {
        self.world_matrix = matrix;
    }

    pub(crate) fn set_previous_world_matrix(&mut self, matrix: Mat4) {
        self.previous_world_matrix = matrix;
    }

    pub(crate) fn set_layer(&mut self, layer: u8) {
        self.layer = layer;
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_motion_vector_mode(&mut self, mode: MotionVectorGenerationMode) {
        self.motion_vector_mode = mode;
    }

    pub(crate) fn set_deformation(&mut self, deformation: Option<Deformation>) {
        self.deformation = deformation;
    }

    /// Roll the current frame into the previous one.
    pub(crate) fn commit_frame(&mut self) {
        self.previous_world_matrix = self.world_matrix;
        if let Some(deformation) = self.deformation.as_mut() {
            deformation.previous.clone_from(&deformation.current);
        }
    }
}

// ===== OBJECT RENDER RECORD =====

/// Transient per-draw view of a render instance, resolved against its
/// mesh and material. Lives for a single draw call.
#[derive(Debug, Clone, Copy)]
pub struct ObjectRenderRecord<'a> {
    pub key: RenderInstanceKey,
    pub mesh_key: MeshKey,
    pub material_key: MaterialKey,
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub model: Mat4,
    pub previous_model: Mat4,
    /// Object-space positions this frame
    pub positions: &'a [Vec3],
    /// Object-space positions last frame
    pub previous_positions: &'a [Vec3],
    pub motion_vector_mode: MotionVectorGenerationMode,
    /// Positions come from a Deformation instead of the mesh
    pub deformed: bool,
}

#[cfg(test)]
#[path = "render_instance_tests.rs"]
mod tests;
