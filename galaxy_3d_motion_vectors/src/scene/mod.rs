//! Scene module
//!
//! Host-side object history consumed by the object motion pass: meshes,
//! materials, render instances with current and previous world matrices,
//! and culling strategies.

mod render_instance;
mod mesh;
mod material;
mod scene;
mod culler;

pub use render_instance::{
    RenderInstance, RenderInstanceKey, MeshKey, MaterialKey,
    MotionVectorGenerationMode, Deformation, ObjectRenderRecord, AABB,
};
pub use mesh::Mesh;
pub use material::{
    Material, CullMode, RenderQueueRange,
    RENDER_QUEUE_BACKGROUND, RENDER_QUEUE_GEOMETRY, RENDER_QUEUE_ALPHA_TEST,
    RENDER_QUEUE_TRANSPARENT,
};
pub use scene::Scene;
pub use culler::{CameraCuller, BruteForceCuller, FrustumCuller, CullingResults};
