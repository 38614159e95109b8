//! Rendering configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Background colour (linear RGB), matches the page fog 0x0a0a0f
    pub clear_color: [f64; 3],

    /// Base colour of machined parts (0x888888)
    pub metal_color: [f32; 3],

    /// Emissive colour of the core and its light (0xff6b00)
    pub glow_color: [f32; 3],

    /// Key light direction (towards the light, world space)
    pub key_light_dir: [f32; 3],

    /// Ambient light term (0x4060a0 at 0.3)
    pub ambient: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            clear_color: [0.039, 0.039, 0.059],
            metal_color: [0.53, 0.53, 0.53],
            glow_color: [1.0, 0.42, 0.0],
            key_light_dir: [10.0, 15.0, 10.0],
            ambient: [0.075, 0.113, 0.188],
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}
