/*!
# Galaxy 3D Motion Vectors

Per-pixel motion vector stage for the Galaxy 3D render graph.

For every rendered frame the stage produces an RG32F image holding, per
pixel, the screen-space displacement of the visible surface since the
previous frame. Temporal effects (TAA, motion blur, temporal upsampling)
consume it.

## Architecture

- **TransformHistory**: per-camera double-buffered view-projection matrices,
  with first-frame and frame-gap detection
- **CameraMotionReconstructor**: camera-only motion reprojected from depth
- **ObjectMotionRasterizer**: per-object motion from current and previous
  model matrices, drawn over the camera motion
- **MotionVectorStage**: per-frame state machine running the passes in order
  and publishing the result
- **RenderGraph**: host scheduler calling stages per camera

The passes run on the CPU; the published image's bytes are the hand-off
format to a GPU host.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod camera;
pub mod history;
pub mod target;
pub mod scene;
pub mod raster;
pub mod passes;
pub mod render_graph;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine (logging hub)
    pub use crate::engine::Engine;

    // Main stage and its settings
    pub use crate::passes::{MotionVectorStage, MotionVectorSettings, StageState};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // History sub-module
    pub mod history {
        pub use crate::history::*;
    }

    // Render target sub-module
    pub mod target {
        pub use crate::target::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Raster sub-module
    pub mod raster {
        pub use crate::raster::*;
    }

    // Passes sub-module
    pub mod passes {
        pub use crate::passes::*;
    }

    // Render graph sub-module
    pub mod render_graph {
        pub use crate::render_graph::*;
    }
}

// Re-export math library at crate root
pub use glam;
