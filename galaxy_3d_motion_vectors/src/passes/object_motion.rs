/// ObjectMotionRasterizer - per-object motion from current and previous
/// model matrices.
///
/// Culls the scene, keeps opaque surfaces whose material has the motion
/// vector pass, sorts them with radix-sorted 64-bit keys and draws them into
/// the target, overwriting camera motion wherever a surface is visible.
///
/// Sort key layout (most significant first):
///
/// ```text
/// [63..52] render queue (12 bits)
/// [51..32] view depth, upper 20 bits of the f32 (front to back)
/// [31..16] material slot (16 bits)
/// [15.. 0] mesh slot (16 bits)
/// ```
///
/// Ties are broken by submission order, so the draw order is deterministic.

use bitflags::bitflags;
use glam::{Mat4, Vec4};
use rdst::{RadixKey, RadixSort};
use slotmap::Key;
use crate::camera::{CullingParameters, Viewport, ALL_LAYERS};
use crate::raster::{MotionVectorEncoding, MotionVertex, TriangleRasterizer};
use crate::scene::{
    CameraCuller, FrustumCuller, MotionVectorGenerationMode, ObjectRenderRecord,
    RenderQueueRange, Scene,
};
use crate::target::MotionVectorTarget;
use crate::{engine_trace, engine_warn};

/// Shader pass tag a material needs to be drawn by the object pass.
pub const MOTION_VECTORS_PASS: &str = "MotionVectors";

/// Meshes up to this many vertices can be merged into a dynamic batch.
const DYNAMIC_BATCH_MAX_VERTICES: usize = 300;

bitflags! {
    /// What the draw order is sorted by.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SortingCriteria: u32 {
        const RENDER_QUEUE            = 1 << 0;
        const QUANTIZED_FRONT_TO_BACK = 1 << 1;
        const OPTIMIZE_STATE_CHANGES  = 1 << 2;

        /// Typical opaque order: queue, then front to back, then state.
        const COMMON_OPAQUE = Self::RENDER_QUEUE.bits()
            | Self::QUANTIZED_FRONT_TO_BACK.bits()
            | Self::OPTIMIZE_STATE_CHANGES.bits();
    }
}

impl Default for SortingCriteria {
    fn default() -> Self {
        SortingCriteria::COMMON_OPAQUE
    }
}

/// How visible surfaces are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSettings {
    pub shader_tag: String,
    pub sorting: SortingCriteria,
    pub enable_dynamic_batching: bool,
    pub enable_instancing: bool,
    pub encoding: MotionVectorEncoding,
}

impl Default for DrawingSettings {
    fn default() -> Self {
        Self {
            shader_tag: MOTION_VECTORS_PASS.to_string(),
            sorting: SortingCriteria::COMMON_OPAQUE,
            enable_dynamic_batching: true,
            enable_instancing: true,
            encoding: MotionVectorEncoding::default(),
        }
    }
}

/// Which visible surfaces are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilteringSettings {
    pub render_queue_range: RenderQueueRange,
    /// Intersected with the camera culling mask
    pub layer_mask: u32,
}

impl Default for FilteringSettings {
    fn default() -> Self {
        Self {
            render_queue_range: RenderQueueRange::OPAQUE,
            layer_mask: ALL_LAYERS,
        }
    }
}

/// Statistics of one object pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Instances returned by the culler
    pub visible: usize,
    /// Instances drawn after filtering
    pub drawn_instances: usize,
    /// Draw calls issued (one per batch)
    pub draw_calls: usize,
    /// Draw calls that merged instances of the same mesh
    pub instanced_batches: usize,
    /// Draw calls that merged small meshes sharing a material
    pub dynamic_batches: usize,
    pub triangles: usize,
    pub pixels_written: u64,
}

/// Radix-sortable draw entry: key first, submission order second.
#[derive(Debug, Clone, Copy)]
struct DrawItem {
    sort_key: u64,
    order: u32,
}

impl RadixKey for DrawItem {
    const LEVELS: usize = 12;

    #[inline]
    fn get_level(&self, level: usize) -> u8 {
        if level < 4 {
            (self.order >> (level * 8)) as u8
        } else {
            (self.sort_key >> ((level - 4) * 8)) as u8
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchKind {
    Single,
    Instanced,
    Dynamic,
}

#[inline]
fn slot_bits<K: Key>(key: K) -> u64 {
    key.data().as_ffi() & 0xFFFF
}

fn build_sort_key(record: &ObjectRenderRecord, criteria: SortingCriteria, view: &Mat4) -> u64 {
    let mut key = 0u64;

    if criteria.contains(SortingCriteria::RENDER_QUEUE) {
        key |= (record.material.render_queue().min(0xFFF) as u64) << 52;
    }
    if criteria.contains(SortingCriteria::QUANTIZED_FRONT_TO_BACK) {
        let center = record.model.transform_point3(record.mesh.bounds().center());
        let depth = (-view.transform_point3(center).z).max(0.0);
        // Positive floats sort like their bit patterns
        let depth_bits = if depth.is_finite() { depth.to_bits() >> 12 } else { 0xF_FFFF };
        key |= (depth_bits as u64 & 0xF_FFFF) << 32;
    }
    if criteria.contains(SortingCriteria::OPTIMIZE_STATE_CHANGES) {
        key |= slot_bits(record.material_key) << 16;
        key |= slot_bits(record.mesh_key);
    }

    key
}

/// Can `next` join a batch started by `head`?
fn batch_kind(
    head: &ObjectRenderRecord,
    next: &ObjectRenderRecord,
    settings: &DrawingSettings,
) -> Option<BatchKind> {
    if head.material_key != next.material_key {
        return None;
    }
    if settings.enable_instancing
        && head.mesh_key == next.mesh_key
        && !head.deformed
        && !next.deformed
    {
        return Some(BatchKind::Instanced);
    }
    if settings.enable_dynamic_batching
        && head.mesh.vertex_count() <= DYNAMIC_BATCH_MAX_VERTICES
        && next.mesh.vertex_count() <= DYNAMIC_BATCH_MAX_VERTICES
    {
        return Some(BatchKind::Dynamic);
    }
    None
}

/// Draws per-object motion into a MotionVectorTarget.
pub struct ObjectMotionRasterizer {
    culler: Box<dyn CameraCuller>,
    items: Vec<DrawItem>,
    vertices: Vec<MotionVertex>,
}

impl Default for ObjectMotionRasterizer {
    fn default() -> Self {
        Self::new(Box::new(FrustumCuller::new()))
    }
}

impl ObjectMotionRasterizer {
    pub fn new(culler: Box<dyn CameraCuller>) -> Self {
        Self {
            culler,
            items: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Replace the culling strategy.
    pub fn set_culler(&mut self, culler: Box<dyn CameraCuller>) {
        self.culler = culler;
    }

    /// Cull, sort, batch and draw the scene.
    ///
    /// Without culling parameters nothing is drawn (the frame keeps
    /// camera-only motion) and empty stats are returned.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        scene: &Scene,
        culling: Option<&CullingParameters>,
        previous_view_proj: &Mat4,
        viewport: &Viewport,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
        target: &mut MotionVectorTarget,
    ) -> DrawStats {
        let Some(params) = culling else {
            engine_warn!("galaxy3d::ObjectMotionRasterizer",
                "No culling parameters, object pass skipped");
            return DrawStats::default();
        };

        let mut stats = DrawStats::default();
        let results = self.culler.cull(scene, params);
        stats.visible = results.visible_count();

        let layer_mask = filtering.layer_mask & params.culling_mask;
        let records: Vec<ObjectRenderRecord> = results.visible_instances()
            .iter()
            .filter(|&&key| {
                scene.render_instance(key).is_some_and(|instance| {
                    instance.is_visible() && instance.is_in_layer_mask(layer_mask)
                })
            })
            .filter_map(|&key| scene.object_record(key))
            .filter(|record| {
                record.motion_vector_mode != MotionVectorGenerationMode::Camera
                    && filtering.render_queue_range.contains(record.material.render_queue())
                    && record.material.has_pass(&drawing.shader_tag)
            })
            .collect();

        self.items.clear();
        self.items.extend(records.iter().enumerate().map(|(order, record)| DrawItem {
            sort_key: build_sort_key(record, drawing.sorting, &params.view_matrix),
            order: order as u32,
        }));
        self.items.radix_sort_unstable();

        let current_view_proj = params.view_projection;
        let mut raster = TriangleRasterizer::new(target, viewport, drawing.encoding);

        let mut start = 0;
        while start < self.items.len() {
            let head = &records[self.items[start].order as usize];
            let mut end = start + 1;
            let mut kind = BatchKind::Single;
            while end < self.items.len() {
                let next = &records[self.items[end].order as usize];
                match batch_kind(head, next, drawing) {
                    Some(k) if kind == BatchKind::Single || kind == k => kind = k,
                    _ => break,
                }
                end += 1;
            }

            stats.draw_calls += 1;
            match kind {
                BatchKind::Instanced => stats.instanced_batches += 1,
                BatchKind::Dynamic => stats.dynamic_batches += 1,
                BatchKind::Single => {}
            }

            for item in &self.items[start..end] {
                let record = &records[item.order as usize];
                stats.triangles += draw_record(
                    &mut raster, &mut self.vertices, record,
                    &current_view_proj, previous_view_proj,
                );
                stats.drawn_instances += 1;
            }
            start = end;
        }

        stats.pixels_written = raster.pixels_written();
        engine_trace!("galaxy3d::ObjectMotionRasterizer",
            "{} visible, {} drawn in {} draw calls, {} pixels",
            stats.visible, stats.drawn_instances, stats.draw_calls, stats.pixels_written);
        stats
    }
}

/// Transform one surface and rasterize its triangles. Returns the triangle count.
///
/// The matrices are always combined the same way so that batched and
/// unbatched draws produce identical bits.
fn draw_record(
    raster: &mut TriangleRasterizer,
    vertices: &mut Vec<MotionVertex>,
    record: &ObjectRenderRecord,
    current_view_proj: &Mat4,
    previous_view_proj: &Mat4,
) -> usize {
    let mvp = *current_view_proj * record.model;
    let previous_mvp = *previous_view_proj * record.previous_model;

    vertices.clear();
    vertices.extend(record.positions.iter().zip(record.previous_positions).map(|(p, q)| {
        MotionVertex::new(mvp * Vec4::from((*p, 1.0)), previous_mvp * Vec4::from((*q, 1.0)))
    }));

    let zero_motion = record.motion_vector_mode == MotionVectorGenerationMode::ForceNoMotion;
    let cull_mode = record.material.cull_mode();
    let mut triangles = 0;
    for triangle in record.mesh.indices().chunks_exact(3) {
        let v = [
            vertices[triangle[0] as usize],
            vertices[triangle[1] as usize],
            vertices[triangle[2] as usize],
        ];
        raster.draw_triangle(v, cull_mode, zero_motion);
        triangles += 1;
    }
    triangles
}

#[cfg(test)]
#[path = "object_motion_tests.rs"]
mod tests;
