//! Render target module
//!
//! CPU-side images exchanged with the host: the motion vector target the
//! stage writes, the depth buffer it reads, and their descriptors.

mod descriptor;
mod depth_buffer;
mod motion_vector_target;

pub use descriptor::{RenderTextureDescriptor, TextureFormat, FilterMode};
pub use depth_buffer::DepthBuffer;
pub use motion_vector_target::{MotionVectorTarget, CLEAR_DEPTH};
