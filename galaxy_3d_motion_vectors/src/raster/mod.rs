//! Raster module
//!
//! Motion vector encoding and the triangle rasterizer used by the object pass.

mod encoding;
mod rasterizer;

pub use encoding::MotionVectorEncoding;
pub use rasterizer::{MotionVertex, TriangleRasterizer};
