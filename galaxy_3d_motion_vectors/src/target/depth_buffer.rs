/// Depth buffer - device depth in [0, 1] produced by the host's depth prepass.
///
/// 0 is the near plane, 1 the far plane. Row 0 is the top of the image.

use crate::error::Result;
use crate::engine_bail;

#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl DepthBuffer {
    /// Depth buffer filled with a constant depth.
    pub fn new(width: u32, height: u32, depth: f32) -> Self {
        Self {
            width,
            height,
            data: vec![depth; width as usize * height as usize],
        }
    }

    /// Depth buffer computed per pixel.
    pub fn from_fn<F: FnMut(u32, u32) -> f32>(width: u32, height: u32, mut f: F) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    /// Wrap existing row-major data.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        if data.len() != width as usize * height as usize {
            engine_bail!("galaxy3d::DepthBuffer",
                "Depth data has {} values, expected {}x{}", data.len(), width, height);
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Depth at pixel (x, y). Panics if out of bounds.
    pub fn depth(&self, x: u32, y: u32) -> f32 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn set_depth(&mut self, x: u32, y: u32, depth: f32) {
        self.data[y as usize * self.width as usize + x as usize] = depth;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
#[path = "depth_buffer_tests.rs"]
mod tests;
