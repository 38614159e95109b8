//! Camera state driven by the choreography.

use glam::{Mat4, Vec3};

use crate::params::CameraConfig;

/// Camera pose plus the viewport aspect ratio
///
/// The look-at target stays at the world origin for the whole reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    pub target: Vec3,
    /// Viewport width / height
    pub aspect: f32,
}

impl CameraState {
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            aspect,
        }
    }

    /// Track a viewport resize. Only the aspect ratio changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Create view-projection matrix for rendering
    pub fn view_proj(&self, config: &CameraConfig) -> Mat4 {
        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            config.fov_degrees.to_radians(),
            self.aspect,
            config.near_plane,
            config.far_plane,
        );
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_only_touches_aspect() {
        let mut camera = CameraState::new(Vec3::new(0.0, 2.0, 25.0), 1.0);
        camera.resize(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 25.0));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn test_minimized_window_keeps_previous_aspect() {
        let mut camera = CameraState::new(Vec3::Z, 1.5);
        camera.resize(0, 720);
        assert_eq!(camera.aspect, 1.5);
    }

    #[test]
    fn test_view_proj_matrix_generation() {
        let camera = CameraState::new(Vec3::new(0.0, 2.0, 25.0), 16.0 / 9.0);
        let view_proj = camera.view_proj(&CameraConfig::default());

        assert_ne!(view_proj, Mat4::IDENTITY);
        assert_ne!(view_proj, Mat4::ZERO);

        // Origin sits in the middle of the screen
        let clip = view_proj * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
