/// Material - render queue, face culling and the passes a shader provides.

/// Render queue constants (lower draws first)
pub const RENDER_QUEUE_BACKGROUND: u32 = 1000;
pub const RENDER_QUEUE_GEOMETRY: u32 = 2000;
pub const RENDER_QUEUE_ALPHA_TEST: u32 = 2450;
pub const RENDER_QUEUE_TRANSPARENT: u32 = 3000;

/// Inclusive range of render queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderQueueRange {
    pub lower: u32,
    pub upper: u32,
}

impl RenderQueueRange {
    /// Opaque and alpha-tested geometry
    pub const OPAQUE: Self = Self { lower: 0, upper: 2500 };
    pub const TRANSPARENT: Self = Self { lower: 2501, upper: 5000 };
    pub const ALL: Self = Self { lower: 0, upper: u32::MAX };

    pub fn contains(&self, queue: u32) -> bool {
        queue >= self.lower && queue <= self.upper
    }
}

/// Which faces are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    /// Discard clockwise (back) faces
    #[default]
    Back,
    /// Discard counter-clockwise (front) faces
    Front,
    /// Draw both sides
    None,
}

#[derive(Debug, Clone)]
pub struct Material {
    name: String,
    render_queue: u32,
    cull_mode: CullMode,
    pass_tags: Vec<String>,
}

impl Material {
    /// Opaque geometry-queue material with back-face culling and no pass.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            render_queue: RENDER_QUEUE_GEOMETRY,
            cull_mode: CullMode::Back,
            pass_tags: Vec::new(),
        }
    }

    /// Add a shader pass tag (e.g. "MotionVectors")
    pub fn with_pass(mut self, tag: &str) -> Self {
        if !self.has_pass(tag) {
            self.pass_tags.push(tag.to_string());
        }
        self
    }

    pub fn with_render_queue(mut self, queue: u32) -> Self {
        self.render_queue = queue;
        self
    }

    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render_queue(&self) -> u32 {
        self.render_queue
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    /// True if the material's shader has a pass with this tag.
    pub fn has_pass(&self, tag: &str) -> bool {
        self.pass_tags.iter().any(|t| t == tag)
    }

    pub fn pass_tags(&self) -> &[String] {
        &self.pass_tags
    }
}
