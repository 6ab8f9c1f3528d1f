/// MotionVectorEncoding - how an NDC delta is stored in the RG32F target.
///
/// Motion is always `current - previous`. For the `Uv` encoding a consumer
/// finds the previous sample with `previous_uv = uv - motion`.

use glam::Vec2;
use crate::camera::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionVectorEncoding {
    /// Texture-space delta (Y down, half the NDC delta)
    #[default]
    Uv,
    /// Raw NDC delta (Y up)
    Ndc,
    /// Pixel delta in the camera viewport (Y down)
    Pixels,
}

impl MotionVectorEncoding {
    /// Encode an NDC delta (current - previous).
    #[inline]
    pub fn encode(&self, ndc_delta: Vec2, viewport: &Viewport) -> Vec2 {
        // 0 - y rather than -y: zero motion stays +0.0
        let flipped_y = 0.0 - ndc_delta.y;
        match self {
            MotionVectorEncoding::Uv => Vec2::new(ndc_delta.x * 0.5, flipped_y * 0.5),
            MotionVectorEncoding::Ndc => ndc_delta,
            MotionVectorEncoding::Pixels => Vec2::new(
                ndc_delta.x * 0.5 * viewport.width,
                flipped_y * 0.5 * viewport.height,
            ),
        }
    }

    /// Recover the NDC delta from a stored value.
    pub fn decode(&self, encoded: Vec2, viewport: &Viewport) -> Vec2 {
        match self {
            MotionVectorEncoding::Uv => Vec2::new(encoded.x * 2.0, -encoded.y * 2.0),
            MotionVectorEncoding::Ndc => encoded,
            MotionVectorEncoding::Pixels => Vec2::new(
                encoded.x * 2.0 / viewport.width,
                -encoded.y * 2.0 / viewport.height,
            ),
        }
    }
}

#[cfg(test)]
#[path = "encoding_tests.rs"]
mod tests;
