/// Mesh - indexed triangle list in object space.

use glam::{Vec2, Vec3};
use crate::error::Result;
use crate::engine_bail;
use super::render_instance::AABB;

#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    bounds: AABB,
}

impl Mesh {
    /// Create a mesh from positions and a triangle list.
    ///
    /// # Errors
    ///
    /// - no vertex
    /// - index count not a multiple of 3
    /// - an index out of range
    pub fn new(name: &str, positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self> {
        let bounds = match AABB::from_points(&positions) {
            Some(b) => b,
            None => engine_bail!("galaxy3d::Mesh", "Mesh '{}' has no vertices", name),
        };

        if indices.len() % 3 != 0 {
            engine_bail!("galaxy3d::Mesh",
                "Mesh '{}' has {} indices, not a triangle list", name, indices.len());
        }

        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            engine_bail!("galaxy3d::Mesh",
                "Mesh '{}' index {} out of range ({} vertices)", name, bad, positions.len());
        }

        Ok(Self {
            name: name.to_string(),
            positions,
            indices,
            bounds,
        })
    }

    /// Axis-aligned quad in the XY plane at z = 0, facing +Z (counter-clockwise).
    pub fn quad(name: &str, half_extent: Vec2) -> Self {
        let (hx, hy) = (half_extent.x, half_extent.y);
        let positions = vec![
            Vec3::new(-hx, -hy, 0.0),
            Vec3::new(hx, -hy, 0.0),
            Vec3::new(hx, hy, 0.0),
            Vec3::new(-hx, hy, 0.0),
        ];
        Self {
            name: name.to_string(),
            bounds: AABB { min: positions[0], max: positions[2] },
            positions,
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Local-space bounds
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
