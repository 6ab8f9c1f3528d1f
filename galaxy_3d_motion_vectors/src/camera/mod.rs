//! Camera module - camera description, viewport, frustum and culling parameters.
//!
//! Cameras are owned and driven by the host. The motion vector stage only
//! reads them, except for the `DepthTextureMode` flags it requests.

mod camera;
mod frustum;
mod viewport;

pub use camera::{Camera, CameraId, CameraType, CullingParameters, DepthTextureMode, ALL_LAYERS};
pub use frustum::Frustum;
pub use viewport::Viewport;
