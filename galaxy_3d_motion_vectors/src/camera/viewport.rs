/// Viewport - pixel rectangle a camera renders into.
///
/// Maps normalized device coordinates to pixel coordinates and back.
/// NDC Y points up, pixel rows grow downward, pixel centers sit at +0.5.

use glam::Vec2;

/// Pixel rectangle inside the render target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Viewport covering a whole `width` x `height` target.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
        }
    }

    /// True if the viewport covers no pixel.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// NDC (x, y) to pixel coordinates.
    pub fn ndc_to_pixel(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.x + (ndc.x * 0.5 + 0.5) * self.width,
            self.y + (0.5 - ndc.y * 0.5) * self.height,
        )
    }

    /// Pixel coordinates to NDC (x, y).
    pub fn pixel_to_ndc(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            (pixel.x - self.x) / self.width * 2.0 - 1.0,
            1.0 - (pixel.y - self.y) / self.height * 2.0,
        )
    }

    /// Integer pixel range `[x0, x1) x [y0, y1)` covered by this viewport,
    /// clamped to a `width` x `height` target.
    pub fn pixel_bounds(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        if self.is_empty() {
            return (0, 0, 0, 0);
        }
        let clamp = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
        (
            clamp(self.x, width),
            clamp(self.y, height),
            clamp(self.x + self.width, width),
            clamp(self.y + self.height, height),
        )
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
