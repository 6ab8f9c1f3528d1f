/// Scene - meshes, materials and RenderInstances for the motion vector passes.
///
/// Uses SlotMaps for O(1) insert/remove with stable keys.
/// Instances are stored contiguously for cache-friendly iteration.

use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use super::mesh::Mesh;
use super::material::Material;
use super::render_instance::{
    RenderInstance, RenderInstanceKey, MeshKey, MaterialKey,
    MotionVectorGenerationMode, Deformation, ObjectRenderRecord,
};

/// A scene containing the host-side object history.
///
/// The host moves instances with `set_world_matrix` during a frame, then
/// calls `commit_frame` once the frame has been rendered so that the
/// current transforms become the previous ones.
#[derive(Default)]
pub struct Scene {
    meshes: SlotMap<MeshKey, Mesh>,
    materials: SlotMap<MaterialKey, Material>,
    /// Render instances stored in a slot map for O(1) insert/remove
    render_instances: SlotMap<RenderInstanceKey, RenderInstance>,
    /// Instances whose transform or vertices changed since the last commit_frame()
    dirty_transforms: FxHashSet<RenderInstanceKey>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== MESHES / MATERIALS =====

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    pub fn mesh(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    // ===== RENDER INSTANCES =====

    /// Iterate over all render instance keys.
    pub fn render_instance_keys(&self) -> impl Iterator<Item = RenderInstanceKey> + '_ {
        self.render_instances.keys()
    }

    /// Create a RenderInstance and add it to the scene
    ///
    /// The previous world matrix starts equal to `world_matrix`, so a new
    /// instance has no motion on its first frame.
    pub fn create_render_instance(
        &mut self,
        mesh: MeshKey,
        material: MaterialKey,
        world_matrix: Mat4,
    ) -> Result<RenderInstanceKey> {
        if !self.meshes.contains_key(mesh) {
            engine_bail!("galaxy3d::Scene", "create_render_instance: unknown mesh key");
        }
        if !self.materials.contains_key(material) {
            engine_bail!("galaxy3d::Scene", "create_render_instance: unknown material key");
        }

        let key = self.render_instances.insert(RenderInstance::new(mesh, material, world_matrix));
        engine_debug!("galaxy3d::Scene", "Created render instance {:?}", key);
        Ok(key)
    }

    /// Remove a RenderInstance. Returns false if the key is invalid.
    pub fn remove_render_instance(&mut self, key: RenderInstanceKey) -> bool {
        self.dirty_transforms.remove(&key);
        self.render_instances.remove(key).is_some()
    }

    /// Get a RenderInstance by key
    pub fn render_instance(&self, key: RenderInstanceKey) -> Option<&RenderInstance> {
        self.render_instances.get(key)
    }

    /// Set the world matrix of a render instance. Returns false if key is invalid.
    pub fn set_world_matrix(&mut self, key: RenderInstanceKey, matrix: Mat4) -> bool {
        if let Some(instance) = self.render_instances.get_mut(key) {
            instance.set_world_matrix(matrix);
            self.dirty_transforms.insert(key);
            true
        } else {
            false
        }
    }

    /// Override the previous-frame world matrix (teleports, host-managed history).
    /// Returns false if key is invalid.
    pub fn set_previous_world_matrix(&mut self, key: RenderInstanceKey, matrix: Mat4) -> bool {
        if let Some(instance) = self.render_instances.get_mut(key) {
            instance.set_previous_world_matrix(matrix);
            self.dirty_transforms.insert(key);
            true
        } else {
            false
        }
    }

    /// Returns false if key is invalid or `layer` is not in 0..32.
    pub fn set_layer(&mut self, key: RenderInstanceKey, layer: u8) -> bool {
        if layer >= 32 {
            return false;
        }
        match self.render_instances.get_mut(key) {
            Some(instance) => {
                instance.set_layer(layer);
                true
            }
            None => false,
        }
    }

    pub fn set_visible(&mut self, key: RenderInstanceKey, visible: bool) -> bool {
        match self.render_instances.get_mut(key) {
            Some(instance) => {
                instance.set_visible(visible);
                true
            }
            None => false,
        }
    }

    pub fn set_motion_vector_mode(
        &mut self,
        key: RenderInstanceKey,
        mode: MotionVectorGenerationMode,
    ) -> bool {
        match self.render_instances.get_mut(key) {
            Some(instance) => {
                instance.set_motion_vector_mode(mode);
                true
            }
            None => false,
        }
    }

    /// Attach current and previous deformed positions to an instance.
    ///
    /// # Errors
    ///
    /// Unknown key, or a position array whose length differs from the
    /// mesh vertex count.
    pub fn set_deformation(
        &mut self,
        key: RenderInstanceKey,
        current: Vec<Vec3>,
        previous: Vec<Vec3>,
    ) -> Result<()> {
        let Some(instance) = self.render_instances.get_mut(key) else {
            engine_bail!("galaxy3d::Scene", "set_deformation: unknown render instance key");
        };
        let vertex_count = self.meshes.get(instance.mesh())
            .map_or(0, |mesh| mesh.vertex_count());
        if current.len() != vertex_count || previous.len() != vertex_count {
            engine_bail!("galaxy3d::Scene",
                "set_deformation: expected {} positions, got {} current / {} previous",
                vertex_count, current.len(), previous.len());
        }

        instance.set_deformation(Some(Deformation { current, previous }));
        self.dirty_transforms.insert(key);
        Ok(())
    }

    /// Remove deformation data. Returns false if key is invalid.
    pub fn clear_deformation(&mut self, key: RenderInstanceKey) -> bool {
        match self.render_instances.get_mut(key) {
            Some(instance) => {
                instance.set_deformation(None);
                true
            }
            None => false,
        }
    }

    /// Get the set of instances with pending transform changes.
    pub fn dirty_transforms(&self) -> &FxHashSet<RenderInstanceKey> {
        &self.dirty_transforms
    }

    /// End of frame: every changed instance's current transform (and
    /// deformed positions) becomes its previous one.
    pub fn commit_frame(&mut self) {
        for key in self.dirty_transforms.drain() {
            if let Some(instance) = self.render_instances.get_mut(key) {
                instance.commit_frame();
            }
        }
    }

    /// Resolve an instance against its mesh and material for drawing.
    ///
    /// Returns None if the key, the mesh or the material is missing.
    pub fn object_record(&self, key: RenderInstanceKey) -> Option<ObjectRenderRecord<'_>> {
        let instance = self.render_instances.get(key)?;
        let mesh = self.meshes.get(instance.mesh())?;
        let material = self.materials.get(instance.material())?;

        let (positions, previous_positions, deformed) = match instance.deformation() {
            Some(d) => (d.current.as_slice(), d.previous.as_slice(), true),
            None => (mesh.positions(), mesh.positions(), false),
        };

        Some(ObjectRenderRecord {
            key,
            mesh_key: instance.mesh(),
            material_key: instance.material(),
            mesh,
            material,
            model: *instance.world_matrix(),
            previous_model: *instance.previous_world_matrix(),
            positions,
            previous_positions,
            motion_vector_mode: instance.motion_vector_mode(),
            deformed,
        })
    }

    /// Iterate over all render instances (key, instance)
    pub fn render_instances(
        &self,
    ) -> impl Iterator<Item = (RenderInstanceKey, &RenderInstance)> {
        self.render_instances.iter()
    }

    /// Get the number of render instances
    pub fn render_instance_count(&self) -> usize {
        self.render_instances.len()
    }

    /// Remove all render instances (meshes and materials are kept)
    pub fn clear(&mut self) {
        self.render_instances.clear();
        self.dirty_transforms.clear();
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
