/// MotionVectorTarget - the RG32F image the stage writes, plus its depth attachment.
///
/// Owned exclusively by the `MotionVectorStage` while a frame is recorded,
/// shared read-only (behind an `Arc`) once published. The depth attachment
/// is private to the object pass and is only used for its depth test.

use glam::Vec2;
use super::descriptor::RenderTextureDescriptor;

/// Depth attachment clear value (far plane)
pub const CLEAR_DEPTH: f32 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MotionVectorTarget {
    descriptor: RenderTextureDescriptor,
    vectors: Vec<Vec2>,
    depth: Vec<f32>,
}

impl MotionVectorTarget {
    /// Allocate a cleared target for the given camera resolution.
    ///
    /// The format is always forced to two float channels, point filtered.
    pub fn new(descriptor: &RenderTextureDescriptor) -> Self {
        let descriptor = descriptor.motion_vectors();
        let count = descriptor.pixel_count();
        Self {
            descriptor,
            vectors: vec![Vec2::ZERO; count],
            depth: vec![CLEAR_DEPTH; count],
        }
    }

    /// Resize to a new resolution (if needed) and clear.
    pub fn reset(&mut self, descriptor: &RenderTextureDescriptor) {
        let descriptor = descriptor.motion_vectors();
        let count = descriptor.pixel_count();
        self.descriptor = descriptor;
        self.vectors.resize(count, Vec2::ZERO);
        self.depth.resize(count, CLEAR_DEPTH);
        self.clear();
    }

    /// Clear motion to zero (no motion) and depth to the far plane.
    pub fn clear(&mut self) {
        self.vectors.fill(Vec2::ZERO);
        self.depth.fill(CLEAR_DEPTH);
    }

    pub fn descriptor(&self) -> &RenderTextureDescriptor {
        &self.descriptor
    }

    pub fn width(&self) -> u32 {
        self.descriptor.width
    }

    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    /// Motion vector at pixel (x, y). Panics if out of bounds.
    pub fn motion(&self, x: u32, y: u32) -> Vec2 {
        self.vectors[self.index(x, y)]
    }

    /// All motion vectors, row-major.
    pub fn vectors(&self) -> &[Vec2] {
        &self.vectors
    }

    /// Raw RG32F bytes for upload to the host's GPU texture.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vectors.as_slice())
    }

    /// Depth attachment value at (x, y).
    pub fn depth(&self, x: u32, y: u32) -> f32 {
        self.depth[self.index(x, y)]
    }

    /// True if every pixel holds exactly zero motion.
    pub fn is_zero(&self) -> bool {
        self.vectors.iter().all(|v| *v == Vec2::ZERO)
    }

    /// Largest per-component deviation from `expected` over all pixels.
    pub fn max_deviation_from(&self, expected: Vec2) -> f32 {
        self.vectors
            .iter()
            .map(|v| (*v - expected).abs().max_element())
            .fold(0.0, f32::max)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.descriptor.width as usize + x as usize
    }

    #[inline]
    pub(crate) fn write_motion(&mut self, x: u32, y: u32, motion: Vec2) {
        let i = self.index(x, y);
        self.vectors[i] = motion;
    }

    /// LessEqual depth test; writes depth and returns true on pass.
    #[inline]
    pub(crate) fn depth_test_and_write(&mut self, x: u32, y: u32, depth: f32) -> bool {
        let i = self.index(x, y);
        if depth <= self.depth[i] {
            self.depth[i] = depth;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[path = "motion_vector_target_tests.rs"]
mod tests;
