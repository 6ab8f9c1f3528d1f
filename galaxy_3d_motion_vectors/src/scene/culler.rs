/// Camera culling strategies.
///
/// A CameraCuller determines which RenderInstances are visible
/// from a given camera. Layer, queue and pass filtering are left to
/// the draw call; a culler only answers "could this be on screen".

use crate::camera::CullingParameters;
use super::scene::Scene;
use super::render_instance::{RenderInstanceKey, AABB};

/// Result of culling a scene for one camera.
#[derive(Debug, Clone, Default)]
pub struct CullingResults {
    visible: Vec<RenderInstanceKey>,
}

impl CullingResults {
    pub fn new(visible: Vec<RenderInstanceKey>) -> Self {
        Self { visible }
    }

    /// Visible instance keys, in scene iteration order.
    pub fn visible_instances(&self) -> &[RenderInstanceKey] {
        &self.visible
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}

/// Strategy for determining visible instances from a camera.
///
/// Called once per camera per frame before drawing.
///
/// `&mut self` allows stateful implementations (e.g. caching)
/// to maintain state across frames.
pub trait CameraCuller: Send + Sync {
    /// Cull the scene and return visible instances.
    fn cull(&mut self, scene: &Scene, params: &CullingParameters) -> CullingResults;
}

/// Brute-force culler - returns ALL instances (no actual culling).
///
/// Suitable for small scenes or as a baseline for comparison.
#[derive(Default)]
pub struct BruteForceCuller;

impl BruteForceCuller {
    pub fn new() -> Self {
        Self
    }
}

impl CameraCuller for BruteForceCuller {
    fn cull(&mut self, scene: &Scene, _params: &CullingParameters) -> CullingResults {
        CullingResults::new(scene.render_instance_keys().collect())
    }
}

/// Frustum culler - tests instance world AABBs against the camera frustum.
///
/// Deformed instances are bounded by their current positions, so a
/// stretched skin is not culled by its rest pose.
#[derive(Default)]
pub struct FrustumCuller;

impl FrustumCuller {
    pub fn new() -> Self {
        Self
    }
}

impl CameraCuller for FrustumCuller {
    fn cull(&mut self, scene: &Scene, params: &CullingParameters) -> CullingResults {
        let visible = scene.render_instances()
            .filter_map(|(key, instance)| {
                let local = match instance.deformation() {
                    Some(d) => AABB::from_points(&d.current)?,
                    None => *scene.mesh(instance.mesh())?.bounds(),
                };
                let world_aabb = local.transformed(instance.world_matrix());
                params.frustum.intersects_aabb(&world_aabb).then_some(key)
            })
            .collect();

        CullingResults::new(visible)
    }
}

#[cfg(test)]
#[path = "culler_tests.rs"]
mod tests;
