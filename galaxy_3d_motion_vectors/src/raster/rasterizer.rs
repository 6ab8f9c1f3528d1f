/// TriangleRasterizer - scan converts clip-space triangles into the motion
/// vector target.
///
/// Each vertex carries its current and previous clip position. Triangles are
/// clipped against the near plane (z >= 0, [0,1] depth), culled by winding,
/// and filled with a top-left rule so shared edges are written exactly once.
/// Depth is interpolated linearly in screen space, the clip positions are
/// interpolated perspective-correct, and the motion vector is the difference
/// of the two projected positions.

use glam::{Vec2, Vec4};
use crate::camera::Viewport;
use crate::scene::CullMode;
use crate::target::MotionVectorTarget;
use super::encoding::MotionVectorEncoding;

/// Clip-space vertex with its previous-frame position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionVertex {
    pub current: Vec4,
    pub previous: Vec4,
}

impl MotionVertex {
    pub fn new(current: Vec4, previous: Vec4) -> Self {
        Self { current, previous }
    }

    #[inline]
    fn lerp(&self, other: &MotionVertex, t: f32) -> MotionVertex {
        MotionVertex {
            current: self.current.lerp(other.current, t),
            previous: self.previous.lerp(other.previous, t),
        }
    }
}

#[derive(Clone, Copy)]
struct ScreenVertex {
    pixel: Vec2,
    depth: f32,
    inv_w: f32,
    clip: MotionVertex,
}

/// Signed double area of (a, b, p) in pixel space.
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    (d.y == 0.0 && d.x > 0.0) || d.y < 0.0
}

#[inline]
fn covers(weight: f32, top_left: bool) -> bool {
    weight > 0.0 || (weight == 0.0 && top_left)
}

/// Sutherland-Hodgman against the near plane (current z >= 0).
fn clip_near(input: &[MotionVertex; 3], out: &mut Vec<MotionVertex>) {
    for i in 0..3 {
        let a = input[i];
        let b = input[(i + 1) % 3];
        let (da, db) = (a.current.z, b.current.z);
        if da >= 0.0 {
            out.push(a);
        }
        if (da >= 0.0) != (db >= 0.0) {
            out.push(a.lerp(&b, da / (da - db)));
        }
    }
}

/// Writes triangles into a MotionVectorTarget for one camera viewport.
pub struct TriangleRasterizer<'a> {
    target: &'a mut MotionVectorTarget,
    viewport: Viewport,
    bounds: (u32, u32, u32, u32),
    encoding: MotionVectorEncoding,
    pixels_written: u64,
    clipped: Vec<MotionVertex>,
}

impl<'a> TriangleRasterizer<'a> {
    pub fn new(
        target: &'a mut MotionVectorTarget,
        viewport: &Viewport,
        encoding: MotionVectorEncoding,
    ) -> Self {
        let bounds = viewport.pixel_bounds(target.width(), target.height());
        Self {
            target,
            viewport: *viewport,
            bounds,
            encoding,
            pixels_written: 0,
            clipped: Vec::with_capacity(4),
        }
    }

    /// Number of pixels that passed coverage and depth tests so far.
    pub fn pixels_written(&self) -> u64 {
        self.pixels_written
    }

    /// Draw one triangle. With `zero_motion` the covered pixels get a zero
    /// vector (depth is still written).
    pub fn draw_triangle(
        &mut self,
        vertices: [MotionVertex; 3],
        cull_mode: CullMode,
        zero_motion: bool,
    ) {
        self.clipped.clear();
        clip_near(&vertices, &mut self.clipped);
        if self.clipped.len() < 3 {
            return;
        }

        let first = self.clipped[0];
        for i in 1..self.clipped.len() - 1 {
            let (b, c) = (self.clipped[i], self.clipped[i + 1]);
            self.fill([first, b, c], cull_mode, zero_motion);
        }
    }

    fn to_screen(&self, vertex: MotionVertex) -> ScreenVertex {
        let inv_w = 1.0 / vertex.current.w;
        let ndc = vertex.current.truncate() * inv_w;
        ScreenVertex {
            pixel: self.viewport.ndc_to_pixel(ndc.truncate()),
            depth: ndc.z,
            inv_w,
            clip: vertex,
        }
    }

    fn fill(&mut self, triangle: [MotionVertex; 3], cull_mode: CullMode, zero_motion: bool) {
        if triangle.iter().any(|v| v.current.w <= 0.0) {
            return;
        }

        let mut v = triangle.map(|vertex| self.to_screen(vertex));
        let area = edge(v[0].pixel, v[1].pixel, v[2].pixel);
        if area == 0.0 || !area.is_finite() {
            return;
        }

        // Counter-clockwise in NDC is negative in pixel space (Y flipped)
        let front_facing = area < 0.0;
        match cull_mode {
            CullMode::Back if !front_facing => return,
            CullMode::Front if front_facing => return,
            _ => {}
        }
        if area < 0.0 {
            v.swap(1, 2);
        }
        let area = area.abs();

        let (x0, y0, x1, y1) = self.bounds;
        let min = v[0].pixel.min(v[1].pixel).min(v[2].pixel);
        let max = v[0].pixel.max(v[1].pixel).max(v[2].pixel);
        let x_start = min.x.floor().max(x0 as f32) as u32;
        let y_start = min.y.floor().max(y0 as f32) as u32;
        let x_end = max.x.ceil().min(x1 as f32).max(0.0) as u32;
        let y_end = max.y.ceil().min(y1 as f32).max(0.0) as u32;

        let top_left = [
            is_top_left(v[1].pixel, v[2].pixel),
            is_top_left(v[2].pixel, v[0].pixel),
            is_top_left(v[0].pixel, v[1].pixel),
        ];

        for py in y_start..y_end {
            for px in x_start..x_end {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge(v[1].pixel, v[2].pixel, p);
                let w1 = edge(v[2].pixel, v[0].pixel, p);
                let w2 = edge(v[0].pixel, v[1].pixel, p);
                if !(covers(w0, top_left[0]) && covers(w1, top_left[1]) && covers(w2, top_left[2])) {
                    continue;
                }

                let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);
                let depth = l0 * v[0].depth + l1 * v[1].depth + l2 * v[2].depth;
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }
                if !self.target.depth_test_and_write(px, py, depth) {
                    continue;
                }

                let motion = if zero_motion {
                    Vec2::ZERO
                } else {
                    self.interpolate_motion(&v, l0, l1, l2)
                };
                self.target.write_motion(px, py, motion);
                self.pixels_written += 1;
            }
        }
    }

    #[inline]
    fn interpolate_motion(&self, v: &[ScreenVertex; 3], l0: f32, l1: f32, l2: f32) -> Vec2 {
        let q0 = l0 * v[0].inv_w;
        let q1 = l1 * v[1].inv_w;
        let q2 = l2 * v[2].inv_w;
        let norm = 1.0 / (q0 + q1 + q2);

        let current = (v[0].clip.current * q0 + v[1].clip.current * q1 + v[2].clip.current * q2) * norm;
        let previous = (v[0].clip.previous * q0 + v[1].clip.previous * q1 + v[2].clip.previous * q2) * norm;
        if previous.w <= 0.0 {
            return Vec2::ZERO;
        }

        let delta = current.truncate().truncate() / current.w
            - previous.truncate().truncate() / previous.w;
        self.encoding.encode(delta, &self.viewport)
    }
}

#[cfg(test)]
#[path = "rasterizer_tests.rs"]
mod tests;
