/// CameraMotionReconstructor - camera-only motion from depth and the
/// current/previous view-projection matrices.
///
/// Full-screen pass: every pixel of the viewport is unprojected with its
/// depth, reprojected with the previous view-projection, and the NDC delta
/// (current - previous) is written. Runs only when the history reports a
/// valid delta.

use glam::{Mat4, Vec2, Vec4};
use crate::camera::Viewport;
use crate::history::HistoryStatus;
use crate::raster::MotionVectorEncoding;
use crate::target::{DepthBuffer, MotionVectorTarget};
use crate::{engine_debug, engine_warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct CameraMotionReconstructor {
    encoding: MotionVectorEncoding,
}

impl CameraMotionReconstructor {
    pub fn new(encoding: MotionVectorEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> MotionVectorEncoding {
        self.encoding
    }

    pub fn set_encoding(&mut self, encoding: MotionVectorEncoding) {
        self.encoding = encoding;
    }

    /// Matrix taking current clip space to previous clip space.
    ///
    /// Identical matrices give the identity so a static camera produces
    /// exactly zero motion.
    pub fn reprojection_matrix(current_view_proj: &Mat4, previous_view_proj: &Mat4) -> Mat4 {
        if current_view_proj == previous_view_proj {
            Mat4::IDENTITY
        } else {
            *previous_view_proj * current_view_proj.inverse()
        }
    }

    /// Write camera motion for every viewport pixel.
    ///
    /// Returns false (target untouched) when the history has no valid delta,
    /// the depth buffer does not match the target, or the current
    /// view-projection cannot be inverted.
    pub fn reconstruct(
        &self,
        depth: &DepthBuffer,
        current_view_proj: &Mat4,
        previous_view_proj: &Mat4,
        status: HistoryStatus,
        viewport: &Viewport,
        target: &mut MotionVectorTarget,
    ) -> bool {
        if !status.has_valid_delta() {
            engine_debug!("galaxy3d::CameraMotionReconstructor",
                "Camera pass skipped ({:?})", status);
            return false;
        }

        if depth.width() != target.width() || depth.height() != target.height() {
            engine_warn!("galaxy3d::CameraMotionReconstructor",
                "Depth buffer is {}x{} but target is {}x{}, camera pass skipped",
                depth.width(), depth.height(), target.width(), target.height());
            return false;
        }

        let determinant = current_view_proj.determinant();
        if !determinant.is_finite() || determinant.abs() <= f32::EPSILON * f32::EPSILON {
            engine_warn!("galaxy3d::CameraMotionReconstructor",
                "View-projection is not invertible, camera pass skipped");
            return false;
        }

        let reprojection = Self::reprojection_matrix(current_view_proj, previous_view_proj);
        let (x0, y0, x1, y1) = viewport.pixel_bounds(target.width(), target.height());

        for y in y0..y1 {
            for x in x0..x1 {
                let ndc = viewport.pixel_to_ndc(Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
                let clip = Vec4::new(ndc.x, ndc.y, depth.depth(x, y), 1.0);
                let previous = reprojection * clip;

                let motion = if previous.w > 0.0 {
                    let previous_ndc = previous.truncate().truncate() / previous.w;
                    self.encoding.encode(ndc - previous_ndc, viewport)
                } else {
                    Vec2::ZERO
                };
                target.write_motion(x, y, motion);
            }
        }

        true
    }
}

#[cfg(test)]
#[path = "camera_motion_tests.rs"]
mod tests;
