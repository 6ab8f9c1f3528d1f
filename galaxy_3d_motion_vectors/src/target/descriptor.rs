/// Texture descriptors for render targets

/// Texel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8A8_UNORM,
    R16G16B16A16_SFLOAT,
    /// Two 32-bit float channels (motion vectors)
    R32G32_SFLOAT,
    D32_FLOAT,
}

impl TextureFormat {
    /// Size of one texel in bytes
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM => 4,
            TextureFormat::R16G16B16A16_SFLOAT => 8,
            TextureFormat::R32G32_SFLOAT => 8,
            TextureFormat::D32_FLOAT => 4,
        }
    }

    /// Number of channels
    pub fn channel_count(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM | TextureFormat::R16G16B16A16_SFLOAT => 4,
            TextureFormat::R32G32_SFLOAT => 2,
            TextureFormat::D32_FLOAT => 1,
        }
    }
}

/// Sampling filter consumers should use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Point,
    Bilinear,
}

/// Size and format of a render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTextureDescriptor {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Texel format
    pub format: TextureFormat,
    /// Filter mode
    pub filter: FilterMode,
}

impl RenderTextureDescriptor {
    /// Color target descriptor (RGBA8, bilinear) - the camera's render resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: TextureFormat::R8G8B8A8_UNORM,
            filter: FilterMode::Bilinear,
        }
    }

    /// Motion vector target descriptor matching this resolution:
    /// two float channels, point filtered.
    pub fn motion_vectors(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            format: TextureFormat::R32G32_SFLOAT,
            filter: FilterMode::Point,
        }
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True if the target has no pixel
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Memory size in bytes
    pub fn memory_size(&self) -> u64 {
        self.pixel_count() as u64 * self.format.bytes_per_pixel() as u64
    }
}
