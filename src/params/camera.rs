//! Camera projection and scroll source configuration.

/// Perspective projection constants
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Vertical field of view (degrees)
    /// 50° = narrow, cinematic framing
    pub fov_degrees: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }
}

/// Virtual scroll document driving the progress value
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    /// Document height as a multiple of the viewport height
    /// One page per stage plus the intro section
    pub page_count: f32,

    /// Pixels scrolled per mouse-wheel line
    pub pixels_per_line: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            page_count: 6.0,
            pixels_per_line: 40.0,
        }
    }
}
